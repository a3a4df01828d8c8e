//! fut-listen - Session Sequencing
//!
//! Platform-agnostic sequencing for listening-comprehension sessions.
//!
//! This crate provides:
//! - The per-file phase order (announce, read, tone, play, wait)
//! - Repeat semantics (`repeat + 1` plays per file)
//! - Timed waits with a late warning tone, or manual confirmation instead
//! - Wall-clock progress reporting around probed durations
//!
//! # Architecture
//!
//! `listen-playback` never plays audio or reads the terminal itself:
//! - Audio output and duration probing come from a [`PlaybackService`]
//! - Confirmations come from a [`Prompter`]
//! - Progress goes to a [`SessionReporter`]
//!
//! # Example
//!
//! ```rust,no_run
//! use listen_playback::{
//!     AnnouncementLibrary, NullReporter, PlaybackService, Prompter, RunConfiguration, Sequencer,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     service: Arc<dyn PlaybackService>,
//! #     prompter: Arc<dyn Prompter>,
//! # ) -> listen_playback::Result<()> {
//! let config = RunConfiguration {
//!     files: vec![PathBuf::from("01.mp3"), PathBuf::from("02.mp3")],
//!     repeat: 0,
//!     delay: 5,
//!     ..RunConfiguration::default()
//! };
//!
//! let sequencer = Sequencer::new(
//!     service,
//!     prompter,
//!     Arc::new(NullReporter),
//!     AnnouncementLibrary::new("assets"),
//! );
//! let summary = sequencer.run(&config).await?;
//! println!("{} plays", summary.plays);
//! # Ok(())
//! # }
//! ```

mod announcements;
mod error;
mod events;
mod sequencer;
mod service;
pub mod types;
mod waiter;

// Public exports
pub use announcements::{Announcement, AnnouncementLibrary, MAX_LISTENING_NUMBER, MAX_PLAY_COUNT};
pub use error::{PlaybackError, Result};
pub use events::{NullReporter, SessionEvent, SessionReporter};
pub use sequencer::{Sequencer, START_SETTLE};
pub use service::{PlaybackService, PlaybackTask, Prompter};
pub use types::{Phase, RunConfiguration, SessionSummary, WarningTone};
pub use waiter::{Waiter, CUE_LEAD_SECONDS};
