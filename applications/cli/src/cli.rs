//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Longest accepted wait, one day
pub const MAX_WAIT_SECONDS: u64 = 86_400;

/// Play the listening section of a test
///
/// Plays every audio file in the current directory (or --path) in name
/// order. By default each file is announced, the listener gets time to read
/// the questions, and the file plays twice with a pause after each play.
/// A high tone precedes every play and a low tone marks the last three
/// seconds of every pause.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "fut-listen")]
#[command(author, version)]
pub struct Cli {
    /// Directory holding the audio files [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Seconds to wait after each play [default: 10]
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(..=MAX_WAIT_SECONDS)
    )]
    pub delay: Option<u64>,

    /// Extra plays per file; each file plays REPEAT + 1 times [default: 1]
    #[arg(short, long)]
    pub repeat: Option<u32>,

    /// Only play the files: no announcements, tones or reading pause
    #[arg(short, long)]
    pub audio_only: bool,

    /// Seconds given to read the questions [default: 15]
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(..=MAX_WAIT_SECONDS)
    )]
    pub reading_delay: Option<u64>,

    /// Wait for ENTER instead of every timed pause
    #[arg(short, long)]
    pub confirm_before: bool,

    /// File to leave out (can be given multiple times)
    #[arg(short = 'x', long, value_name = "FILE")]
    pub exclude: Vec<PathBuf>,

    /// Don't play the start announcement
    #[arg(long)]
    pub no_start: bool,

    /// Don't play the end announcement
    #[arg(long)]
    pub no_end: bool,

    /// Don't play warning tones
    #[arg(long)]
    pub no_tone: bool,

    /// Don't give reading time
    #[arg(long)]
    pub no_read: bool,

    /// Audio file extension to match [default: mp3]
    #[arg(long)]
    pub ext: Option<String>,

    /// Directory holding the announcement and tone assets
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Settings file [default: ./fut-listen.toml when present]
    #[arg(long, value_name = "FILE", env = "FUT_LISTEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Start without asking "Are you ready to start?"
    #[arg(short, long)]
    pub yes: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter matching the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
