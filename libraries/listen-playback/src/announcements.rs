//! Pre-rendered announcement and tone assets
//!
//! The asset generator renders a fixed set of spoken phrases (`.m4a`) and two
//! tones (`.mp3`) into one directory. Assets are addressed here by meaning;
//! whether a file actually exists is only discovered when it is played.

use crate::types::WarningTone;
use std::path::{Path, PathBuf};

/// Highest listening number the generator renders
pub const MAX_LISTENING_NUMBER: usize = 10;

/// Highest play count the generator renders
pub const MAX_PLAY_COUNT: u32 = 5;

const SPEECH_EXTENSION: &str = "m4a";
const TONE_EXTENSION: &str = "mp3";

/// Spoken phrase played at a fixed point of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Announcement {
    /// "Now starting the listening section of the test."
    Start,

    /// "The listening section is finished."
    End,

    /// "Listening number N"
    ListeningNumber(usize),

    /// "The audio will play N time(s)"
    PlayCount(u32),

    /// "Before we start listening, you can read the questions."
    ReadQuestions,
}

impl Announcement {
    /// File stem of the rendered asset, if the generator produces one
    pub fn asset_stem(self) -> Option<String> {
        match self {
            Announcement::Start => Some("now_starting_the_listening_section_of_the_test".into()),
            Announcement::End => Some("the_listening_section_is_finished".into()),
            Announcement::ReadQuestions => {
                Some("before_we_start_listening_you_can_read_the_questions".into())
            }
            Announcement::ListeningNumber(n) if (1..=MAX_LISTENING_NUMBER).contains(&n) => {
                Some(format!("listening_number_{n}"))
            }
            Announcement::PlayCount(n) if (1..=MAX_PLAY_COUNT).contains(&n) => {
                Some(format!("audio_play_{n}"))
            }
            Announcement::ListeningNumber(_) | Announcement::PlayCount(_) => None,
        }
    }
}

/// Directory of rendered assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementLibrary {
    root: PathBuf,
}

impl AnnouncementLibrary {
    /// Create a library rooted at the given asset directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the spoken asset, or `None` when the number is out of the rendered range
    pub fn announcement(&self, announcement: Announcement) -> Option<PathBuf> {
        announcement
            .asset_stem()
            .map(|stem| self.root.join(format!("{stem}.{SPEECH_EXTENSION}")))
    }

    /// Path of a warning tone asset
    pub fn tone(&self, tone: WarningTone) -> PathBuf {
        self.root
            .join(format!("{}.{TONE_EXTENSION}", tone.asset_name()))
    }

    /// Every asset the generator is expected to have produced
    pub fn expected_assets(&self) -> Vec<PathBuf> {
        let fixed = [
            Announcement::Start,
            Announcement::End,
            Announcement::ReadQuestions,
        ];
        let numbers = (1..=MAX_LISTENING_NUMBER).map(Announcement::ListeningNumber);
        let counts = (1..=MAX_PLAY_COUNT).map(Announcement::PlayCount);

        fixed
            .into_iter()
            .chain(numbers)
            .chain(counts)
            .filter_map(|a| self.announcement(a))
            .chain([self.tone(WarningTone::E6), self.tone(WarningTone::A5)])
            .collect()
    }

    /// Expected assets that are not on disk
    pub fn missing_assets(&self) -> Vec<PathBuf> {
        self.expected_assets()
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }
}
