//! fut-listen - listening-section player
//!
//! Wires the session sequencer to a desktop player process, the terminal
//! and a layered settings file. The binary in `main.rs` is a thin shell
//! around [`app::run`].

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod terminal;

pub use app::Outcome;
pub use cli::Cli;
pub use self::config::Settings;
pub use error::{AppError, Result};
