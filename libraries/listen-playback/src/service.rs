//! External collaborators of the sequencer
//!
//! The sequencer never decodes audio or touches the terminal itself. It plays
//! files through a [`PlaybackService`] and blocks on a [`Prompter`] in
//! confirm-before mode; platform crates provide the implementations.

use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Capability to play audio files and probe their length
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaybackService: Send + Sync {
    /// Verify the backing player can be run at all
    ///
    /// Fails with [`PlaybackError::PrerequisiteMissing`] when it cannot.
    async fn ensure_available(&self) -> Result<()>;

    /// Play a file to completion
    async fn play(&self, path: &Path) -> Result<()>;

    /// Start playing a file in the background
    ///
    /// The returned task owns the player; dropping it stops playback.
    async fn spawn(&self, path: &Path) -> Result<PlaybackTask>;

    /// Length of a file, `None` when it cannot be determined
    async fn duration(&self, path: &Path) -> Result<Option<Duration>>;
}

/// Blocking acknowledgement from the person running the session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Suspend until the user confirms that the session may continue
    async fn confirm_continue(&self) -> Result<()>;
}

/// Cancellable handle to a background playback
///
/// Aborts the underlying task when dropped.
#[derive(Debug)]
pub struct PlaybackTask {
    handle: Option<JoinHandle<Result<()>>>,
}

impl PlaybackTask {
    /// Run a playback future on the current tokio runtime
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Whether the playback has ended
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the playback to end
    ///
    /// Cancel-safe: if this future is dropped the task keeps its handle and is
    /// aborted when the task itself is dropped.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };
        let joined = handle.await;
        self.handle = None;

        match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(PlaybackError::Invocation(format!(
                "playback task panicked: {e}"
            ))),
        }
    }
}

impl Drop for PlaybackTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
