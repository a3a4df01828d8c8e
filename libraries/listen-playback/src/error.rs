//! Error types for listening sessions

use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The external player cannot be run on this machine
    #[error("Prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    /// A file that was resolved for the session no longer exists
    #[error("File vanished before it could be played: {}", .0.display())]
    FileVanished(PathBuf),

    /// The player or duration probe failed for a single invocation
    #[error("Playback invocation failed: {0}")]
    Invocation(String),

    /// Reading the user's confirmation failed
    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl PlaybackError {
    /// Whether the session must stop when this error surfaces
    ///
    /// Invocation failures degrade to best-effort continuation; everything
    /// else ends the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PlaybackError::Invocation(_))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invocation_failures_are_recoverable() {
        assert!(!PlaybackError::Invocation("mpv exited 2".into()).is_fatal());
        assert!(PlaybackError::FileVanished(PathBuf::from("/tmp/a.mp3")).is_fatal());
        assert!(PlaybackError::PrerequisiteMissing("mpv".into()).is_fatal());
        assert!(PlaybackError::Prompt("stdin closed".into()).is_fatal());
    }

    #[test]
    fn vanished_message_names_the_file() {
        let err = PlaybackError::FileVanished(PathBuf::from("/audio/03.mp3"));
        assert_eq!(
            err.to_string(),
            "File vanished before it could be played: /audio/03.mp3"
        );
    }
}
