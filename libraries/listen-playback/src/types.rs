//! Core types for listening sessions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved settings for one listening session
///
/// Built once from CLI input and the file resolver, then held read-only by
/// the sequencer for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Audio files in play order (unique, sorted by name, exclusions applied)
    pub files: Vec<PathBuf>,

    /// Seconds to wait after each playback (default: 10)
    pub delay: u64,

    /// Extra plays per file; total plays = repeat + 1 (default: 1)
    pub repeat: u32,

    /// Play the raw files only: no announcements, tones or wait display
    pub audio_only: bool,

    /// Seconds given to read the questions before the first play (default: 15)
    pub reading_delay: u64,

    /// Replace every timed wait with a manual confirmation
    pub confirm_before: bool,

    /// Skip the start announcement
    pub no_start: bool,

    /// Skip the end announcement
    pub no_end: bool,

    /// Skip all warning tones
    pub no_tone: bool,

    /// Skip the reading pause
    pub no_read: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            delay: 10,
            repeat: 1,
            audio_only: false,
            reading_delay: 15,
            confirm_before: false,
            no_start: false,
            no_end: false,
            no_tone: false,
            no_read: false,
        }
    }
}

impl RunConfiguration {
    /// Total number of times each file is played
    pub fn plays_per_file(&self) -> u32 {
        self.repeat.saturating_add(1)
    }

    /// Whether spoken announcements are played at all
    pub fn announcements_enabled(&self) -> bool {
        !self.audio_only
    }

    /// Whether the high tone precedes each playback
    pub fn pre_play_tone_enabled(&self) -> bool {
        !self.no_tone && !self.audio_only && !self.confirm_before
    }

    /// Whether timed waits inject the low tone near their end
    pub fn wait_tone_enabled(&self) -> bool {
        !self.no_tone && !self.audio_only && !self.confirm_before
    }

    /// Whether a reading pause happens before the first play of each file
    pub fn reading_pause_enabled(&self) -> bool {
        !self.no_read && self.reading_delay > 0 && !self.audio_only
    }
}

/// Stage of the listening sequence
///
/// Transient marker used for event reporting and logging; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start announcement and settle pause
    Start,

    /// Pause for reading the questions
    ReadingPause,

    /// High tone right before a playback
    PrePlayTone,

    /// The file itself
    Playback,

    /// Wait (or confirmation) after a playback
    PostDelay,

    /// End announcement
    End,
}

/// Short synthesized cue played at fixed points of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningTone {
    /// High tone, played immediately before each playback
    E6,

    /// Low tone, played in the final seconds of a timed wait
    A5,
}

impl WarningTone {
    /// Asset name of the pre-rendered tone
    pub fn asset_name(self) -> &'static str {
        match self {
            WarningTone::E6 => "E6",
            WarningTone::A5 => "A5",
        }
    }
}

/// Outcome of a completed session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of files visited
    pub files: usize,

    /// Number of file playbacks started
    pub plays: u32,

    /// Non-fatal invocations that failed and were skipped
    pub degraded: u32,
}
