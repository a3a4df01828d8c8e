//! Session setup and execution

use crate::cli::Cli;
use crate::config::{Settings, MIN_COMFORTABLE_DELAY};
use crate::error::{Result, EXIT_INTERRUPTED};
use crate::terminal::{self, StdinPrompter, TerminalReporter};
use listen_audio_desktop::ProcessPlayer;
use listen_importer::TrackResolver;
use listen_playback::{
    AnnouncementLibrary, PlaybackService, RunConfiguration, Sequencer, SessionSummary,
};
use std::path::PathBuf;
use std::sync::Arc;

/// How a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every file was played
    Completed(SessionSummary),
    /// The listener answered "no" to "Are you ready to start?"
    Declined,
    /// Ctrl-C
    Interrupted,
}

impl Outcome {
    /// Process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Completed(_) | Outcome::Declined => 0,
            Outcome::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// Directory to scan, defaulting to the working directory
fn session_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.path {
        Some(path) => Ok(path.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Resolve settings, files and assets into a run configuration
pub fn prepare(cli: &Cli, settings: &Settings) -> Result<(RunConfiguration, AnnouncementLibrary)> {
    let dir = session_dir(cli)?;
    let files = TrackResolver::new(dir)
        .extension(settings.extension(cli))
        .exclude(cli.exclude.iter().cloned())
        .resolve()?;

    let config = settings.run_configuration(cli, files);
    let library = AnnouncementLibrary::new(settings.assets_dir(cli));
    Ok((config, library))
}

/// Problems worth telling the listener about before starting
pub fn preflight_warnings(config: &RunConfiguration, library: &AnnouncementLibrary) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.confirm_before && config.delay < MIN_COMFORTABLE_DELAY {
        warnings.push(format!(
            "A delay of {}s is very short; {}s or more is recommended.",
            config.delay, MIN_COMFORTABLE_DELAY
        ));
    }

    if !config.audio_only {
        let missing = library.missing_assets();
        if !missing.is_empty() {
            warnings.push(format!(
                "{} announcement/tone asset(s) missing from {}; they will be skipped.",
                missing.len(),
                library.root().display()
            ));
        }
    }

    warnings
}

/// Resolves once Ctrl-C is pressed
///
/// Never resolves if the signal handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run fut-listen end to end
pub async fn run(cli: Cli) -> Result<Outcome> {
    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!("Settings: {:?}", settings);

    let player = ProcessPlayer::new(settings.player.program.clone())
        .with_args(settings.player.args.iter().cloned());
    player.ensure_available().await?;

    let (config, library) = prepare(&cli, &settings)?;
    tracing::info!(
        "{} file(s), delay {}s, {} play(s) each",
        config.files.len(),
        config.delay,
        config.plays_per_file()
    );

    if cli.yes {
        terminal::show_listing(&config.files);
    } else {
        terminal::show_session_intro(&config.files);
    }
    for warning in preflight_warnings(&config, &library) {
        tracing::warn!("{}", warning);
        terminal::warning(&warning);
    }

    if !cli.yes {
        let ready = tokio::select! {
            answer = terminal::ask("Are you ready to start?") => answer?,
            () = interrupted() => return Ok(Outcome::Interrupted),
        };
        if !ready {
            tracing::info!("Listener declined to start");
            return Ok(Outcome::Declined);
        }
    }

    let reporter = Arc::new(TerminalReporter::new(config.audio_only));
    let sequencer = Sequencer::new(
        Arc::new(player),
        Arc::new(StdinPrompter::new()),
        Arc::clone(&reporter) as Arc<dyn listen_playback::SessionReporter>,
        library,
    );

    tokio::select! {
        result = sequencer.run(&config) => {
            let summary = result?;
            terminal::notice("The listening section is finished.");
            if summary.degraded > 0 {
                terminal::warning(&format!(
                    "{} step(s) could not be played; run with -v for details.",
                    summary.degraded
                ));
            }
            Ok(Outcome::Completed(summary))
        }
        () = interrupted() => {
            reporter.clear();
            terminal::notice("Interrupted.");
            Ok(Outcome::Interrupted)
        }
    }
}
