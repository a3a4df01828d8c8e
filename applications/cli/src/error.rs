/// Application error types
use listen_importer::ImportError;
use listen_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Exit code for a run cut short by Ctrl-C
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Playback(PlaybackError::PrerequisiteMissing(_)) => 2,
            AppError::Import(ImportError::NoInputFiles { .. }) => 3,
            AppError::Playback(PlaybackError::FileVanished(_)) => 4,
            _ => 1,
        }
    }
}
