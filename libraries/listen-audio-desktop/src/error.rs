/// Desktop playback errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type for desktop playback operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Desktop playback errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// The player program could not be started at all
    #[error("Player '{program}' is not available: {reason}")]
    PlayerUnavailable { program: String, reason: String },

    /// Audio file does not exist
    #[error("Audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The player ran but reported failure
    #[error("Player exited with {status}: {stderr}")]
    PlayerFailed { status: String, stderr: String },

    /// Duration probe failed
    #[error("Probe error: {0}")]
    Probe(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lofty::error::LoftyError> for AudioError {
    fn from(err: lofty::error::LoftyError) -> Self {
        AudioError::Probe(err.to_string())
    }
}

impl From<AudioError> for listen_playback::PlaybackError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::PlayerUnavailable { .. } => {
                listen_playback::PlaybackError::PrerequisiteMissing(err.to_string())
            }
            other => listen_playback::PlaybackError::Invocation(other.to_string()),
        }
    }
}
