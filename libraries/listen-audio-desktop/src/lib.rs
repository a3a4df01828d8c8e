//! Desktop playback for fut-listen
//!
//! Implements [`listen_playback::PlaybackService`] by launching an external
//! command-line player (mpv by default) for each file, and probes track
//! lengths from container metadata with lofty.
//!
//! # Example
//!
//! ```no_run
//! use listen_audio_desktop::ProcessPlayer;
//! use listen_playback::PlaybackService;
//! use std::path::Path;
//!
//! # async fn run() -> listen_playback::Result<()> {
//! let player = ProcessPlayer::mpv();
//! player.ensure_available().await?;
//! player.play(Path::new("assets/E6.mp3")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod player;
mod probe;

pub use error::{AudioError, Result};
pub use player::{ProcessPlayer, DEFAULT_PLAYER, MPV_ARGS};
pub use probe::probe_duration;
