/// fut-listen - plays the listening section of a test
use clap::Parser;
use fut_listen::{app, terminal, Cli};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CRATES: &[&str] = &[
    "fut_listen",
    "listen_playback",
    "listen_audio_desktop",
    "listen_importer",
];

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_filter()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match app::run(cli).await {
        Ok(outcome) => {
            tracing::debug!("Finished: {:?}", outcome);
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            tracing::debug!("Fatal: {:?}", e);
            terminal::failure(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over the `-v` level
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let default_filter = std::iter::once("warn".to_string())
        .chain(CRATES.iter().map(|krate| format!("{krate}={level}")))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?)
        .try_init()?;

    Ok(())
}
