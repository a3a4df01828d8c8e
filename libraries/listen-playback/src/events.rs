//! Session events
//!
//! Progress is pushed to a [`SessionReporter`] at key points:
//! - Phase changes (start, reading pause, playback, post delay, end)
//! - File start/finish
//! - Warning tone cues
//! - Playback and wait progress (at least once per second)
//! - Player failures

use crate::announcements::Announcement;
use crate::types::{Phase, WarningTone};
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a session runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The sequence entered a new phase
    PhaseStarted {
        /// Phase being entered
        phase: Phase,
    },

    /// A new file is about to be announced and played
    FileStarted {
        /// 1-based position in the session
        number: usize,
        /// Number of files in the session
        total: usize,
        /// File being visited
        path: PathBuf,
    },

    /// A spoken announcement was played (or attempted)
    AnnouncementPlayed {
        /// Which announcement
        announcement: Announcement,
    },

    /// A warning tone was started
    ToneCue {
        /// Which tone
        tone: WarningTone,
        /// Whether the sequence waited for the tone to finish
        blocking: bool,
    },

    /// Playback of a session file started
    PlaybackStarted {
        /// File being played
        path: PathBuf,
        /// 1-based play within this file's repeats
        play: u32,
        /// Total plays for this file
        plays: u32,
        /// Probed length; `None` means progress is indeterminate
        duration: Option<Duration>,
    },

    /// Wall-clock progress of the current playback
    PlaybackProgress {
        /// Time since playback started
        elapsed: Duration,
        /// Probed length, if known
        duration: Option<Duration>,
    },

    /// The player failed to start or exited with an error
    ///
    /// May arrive after [`SessionEvent::PlaybackFinished`] when the player
    /// outlived the known duration.
    PlaybackFailed {
        /// File that was being played
        path: PathBuf,
        /// Error message
        reason: String,
    },

    /// The current playback is considered done
    PlaybackFinished {
        /// File that was played
        path: PathBuf,
    },

    /// A timed wait started
    WaitStarted {
        /// Length of the wait in seconds
        seconds: u64,
        /// Whether the low tone will be injected
        tone_enabled: bool,
    },

    /// Progress of the current timed wait
    WaitProgress {
        /// Whole seconds elapsed
        elapsed: u64,
        /// Length of the wait in seconds
        seconds: u64,
    },

    /// The current timed wait ended
    WaitFinished,

    /// The sequence is blocked on a manual confirmation
    ConfirmationRequested {
        /// Phase the confirmation stands in for or precedes
        phase: Phase,
    },

    /// Every play of a file is done
    FileFinished {
        /// 1-based position in the session
        number: usize,
    },
}

/// Sink for session events
///
/// Implementations must not block; the sequencer calls this inline.
pub trait SessionReporter: Send + Sync {
    /// Handle one event
    fn report(&self, event: SessionEvent);
}

/// Reporter that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl SessionReporter for NullReporter {
    fn report(&self, _event: SessionEvent) {}
}
