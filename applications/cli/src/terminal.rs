//! Terminal presentation and input
//!
//! Everything the listener sees goes to stdout through `console` styles and
//! `indicatif` bars; tracing output stays on stderr.

use async_trait::async_trait;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use listen_playback::{PlaybackError, Prompter, SessionEvent, SessionReporter};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

const SPLASH: &str = "
  /`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`
  /`     ┏━╸╻ ╻╺┳╸   ╻  ╻┏━┓╺┳╸┏━╸┏┓╻     /`
  /`     ┣╸ ┃ ┃ ┃ ╺━╸┃  ┃┗━┓ ┃ ┣╸ ┃┗┫     /`
  /`     ╹  ┗━┛ ╹    ┗━╸╹┗━┛ ╹ ┗━╸╹ ╹     /`
  /`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`/`
";

const LISTING_RULE_WIDTH: usize = 50;
const FILE_RULE_WIDTH: usize = 60;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn rule(width: usize) -> String {
    style("-".repeat(width)).dim().to_string()
}

/// Banner with the border characters highlighted
pub fn splash() -> String {
    SPLASH
        .chars()
        .map(|c| match c {
            '`' => style(c).blue().bold().to_string(),
            '/' => style(c).blue().to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// `  01. name` lines for the play order
pub fn listing_lines(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .enumerate()
        .map(|(index, path)| format!("  {:02}. {}", index + 1, file_name(path)))
        .collect()
}

/// Clear the screen and show the banner and play order
pub fn show_session_intro(files: &[PathBuf]) {
    let term = Term::stdout();
    let _ = term.clear_screen();
    let _ = term.write_line(&splash());
    show_listing(files);
}

/// Show the play order
pub fn show_listing(files: &[PathBuf]) {
    let term = Term::stdout();
    let _ = term.write_line(&format!(
        "The following {} file(s) will play in this order:",
        files.len()
    ));
    let _ = term.write_line(&rule(LISTING_RULE_WIDTH));
    for line in listing_lines(files) {
        let _ = term.write_line(&line);
    }
    let _ = term.write_line(&rule(LISTING_RULE_WIDTH));
}

/// `>>> [INFO] text`
pub fn notice(text: &str) {
    let prefix = style(">>> ").dim();
    let tag = style("[INFO]").black().on_green();
    let _ = Term::stdout().write_line(&format!("{prefix}{tag} {text}"));
}

fn warning_line(text: &str) -> String {
    let prefix = style(">>> ").dim();
    let tag = style("[WARN]").black().on_yellow();
    format!("{prefix}{tag} {text}")
}

/// `>>> [WARN] text`
pub fn warning(text: &str) {
    let _ = Term::stdout().write_line(&warning_line(text));
}

/// Fatal error line on stderr
pub fn failure(text: &str) {
    let _ = Term::stderr().write_line(&style(text).red().to_string());
}

/// Read one line from stdin without tying up the runtime
///
/// The read happens on a plain thread, so an abandoned prompt never keeps
/// the runtime from shutting down.
async fn read_line() -> io::Result<String> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let result = match io::stdin().read_line(&mut line) {
            Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            Ok(_) => Ok(line),
            Err(e) => Err(e),
        };
        let _ = tx.send(result);
    });

    rx.await
        .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "input reader stopped"))?
}

/// Interpret a yes/no answer; empty means no
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" | "n" | "no" => Some(false),
        "y" | "yes" => Some(true),
        _ => None,
    }
}

/// Ask a yes/no question, re-asking until the answer is understood
pub async fn ask(question: &str) -> io::Result<bool> {
    let term = Term::stdout();
    loop {
        term.write_str(&format!("{} [y/N]: ", style(question).bold()))?;
        let line = read_line().await?;
        if let Some(answer) = parse_answer(&line) {
            return Ok(answer);
        }
        term.write_line("Error: invalid input")?;
    }
}

/// Confirmations read from the terminal
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn confirm_continue(&self) -> listen_playback::Result<()> {
        let prompt = style(">>> Press [ENTER] to continue...").bold();
        Term::stdout()
            .write_str(&prompt.to_string())
            .map_err(|e| PlaybackError::Prompt(e.to_string()))?;

        read_line()
            .await
            .map(|_| ())
            .map_err(|e| PlaybackError::Prompt(e.to_string()))
    }
}

/// Renders session events as notices and progress bars
pub struct TerminalReporter {
    quiet_waits: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    /// `quiet_waits` hides the countdown for timed waits
    pub fn new(quiet_waits: bool) -> Self {
        Self {
            quiet_waits,
            bar: Mutex::new(None),
        }
    }

    fn start_bar(&self, bar: ProgressBar) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn update_bar(&self, position: u64) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(position);
            }
        }
    }

    /// Remove any bar still on screen
    pub fn clear(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    /// Print a line without breaking the bar on screen, if any
    fn print_above_bar(&self, line: &str) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.println(line);
                return;
            }
        }
        let _ = Term::stdout().write_line(line);
    }

    fn finish_bar(&self, message: &'static str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_with_message(message);
            }
        }
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn countdown_bar(seconds: u64) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(seconds), ProgressDrawTarget::stdout());
    bar.set_style(bar_style("    [{bar:40.cyan/blue}] {pos}/{len}s {msg}"));
    bar
}

fn playback_bar(duration: Option<Duration>) -> ProgressBar {
    match duration {
        Some(duration) => {
            let bar = ProgressBar::with_draw_target(
                Some(duration.as_secs()),
                ProgressDrawTarget::stdout(),
            );
            bar.set_style(bar_style("    [{bar:40.green}] {pos}/{len}s"));
            bar
        }
        None => {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
            bar.set_style(
                ProgressStyle::with_template("    {spinner:.green} {elapsed} playing")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        }
    }
}

impl SessionReporter for TerminalReporter {
    fn report(&self, event: SessionEvent) {
        match event {
            SessionEvent::FileStarted { number, path, .. } => {
                let rule = style("=".repeat(FILE_RULE_WIDTH)).dim();
                let _ = Term::stdout().write_line(&rule.to_string());
                notice(&format!("Starting #{number}: {}", file_name(&path)));
            }
            SessionEvent::PlaybackStarted {
                path,
                play,
                plays,
                duration,
            } => {
                notice(&format!("Playing {} ({play}/{plays})", file_name(&path)));
                self.start_bar(playback_bar(duration));
            }
            SessionEvent::PlaybackProgress { elapsed, .. } => {
                self.update_bar(elapsed.as_secs());
            }
            SessionEvent::PlaybackFailed { path, reason } => {
                self.print_above_bar(&warning_line(&format!(
                    "{} did not play cleanly: {reason}",
                    file_name(&path)
                )));
            }
            SessionEvent::PlaybackFinished { .. } => self.clear(),
            SessionEvent::WaitStarted { seconds, .. } if !self.quiet_waits => {
                notice(&format!("Waiting for {seconds} second(s)."));
                self.start_bar(countdown_bar(seconds));
            }
            SessionEvent::WaitProgress { elapsed, .. } => self.update_bar(elapsed),
            SessionEvent::WaitFinished => self.finish_bar("continuing"),
            SessionEvent::PhaseStarted { .. }
            | SessionEvent::AnnouncementPlayed { .. }
            | SessionEvent::ToneCue { .. }
            | SessionEvent::WaitStarted { .. }
            | SessionEvent::ConfirmationRequested { .. }
            | SessionEvent::FileFinished { .. } => {}
        }
    }
}
