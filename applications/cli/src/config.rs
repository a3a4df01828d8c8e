/// Settings file and environment configuration
use crate::cli::{Cli, MAX_WAIT_SECONDS};
use crate::error::{AppError, Result};
use listen_playback::RunConfiguration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fut-listen.toml";

/// Prefix for environment overrides, e.g. `FUT_LISTEN_PLAYER__PROGRAM`
pub const ENV_PREFIX: &str = "FUT_LISTEN";

/// Delays shorter than this leave no room for the warning tone to register
pub const MIN_COMFORTABLE_DELAY: u64 = 5;

/// Name of the asset directory shipped with the program
const ASSETS_DIR_NAME: &str = "assets";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub session: SessionDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionDefaults {
    #[serde(default = "default_delay")]
    pub delay: u64,

    #[serde(default = "default_repeat")]
    pub repeat: u32,

    #[serde(default = "default_reading_delay")]
    pub reading_delay: u64,

    #[serde(default = "default_ext")]
    pub ext: String,
}

impl Settings {
    /// Load settings from the settings file and `FUT_LISTEN_*` variables
    ///
    /// An explicit `path` must exist; otherwise `./fut-listen.toml` is read
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    /// Load settings with a specific environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!("Loading settings from {}", DEFAULT_CONFIG_FILE);
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(env);

        let settings: Self = settings.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.player.program.trim().is_empty() {
            return Err(AppError::Config(
                "player.program must not be empty (set FUT_LISTEN_PLAYER__PROGRAM)".to_string(),
            ));
        }

        for (key, seconds) in [
            ("session.delay", self.session.delay),
            ("session.reading_delay", self.session.reading_delay),
        ] {
            if seconds > MAX_WAIT_SECONDS {
                return Err(AppError::Config(format!(
                    "{key} must be at most {MAX_WAIT_SECONDS} seconds"
                )));
            }
        }

        if self.session.ext.trim_start_matches('.').is_empty() {
            return Err(AppError::Config(
                "session.ext must name a file extension".to_string(),
            ));
        }

        Ok(())
    }

    /// Combine CLI flags with these defaults into a run configuration
    ///
    /// Flags win over settings; `files` comes from track resolution.
    pub fn run_configuration(&self, cli: &Cli, files: Vec<PathBuf>) -> RunConfiguration {
        RunConfiguration {
            files,
            delay: cli.delay.unwrap_or(self.session.delay),
            repeat: cli.repeat.unwrap_or(self.session.repeat),
            audio_only: cli.audio_only,
            reading_delay: cli.reading_delay.unwrap_or(self.session.reading_delay),
            confirm_before: cli.confirm_before,
            no_start: cli.no_start,
            no_end: cli.no_end,
            no_tone: cli.no_tone,
            no_read: cli.no_read,
        }
    }

    /// Extension to match, flag first
    pub fn extension<'a>(&'a self, cli: &'a Cli) -> &'a str {
        cli.ext.as_deref().unwrap_or(&self.session.ext)
    }

    /// Asset directory, flag first
    pub fn assets_dir<'a>(&'a self, cli: &'a Cli) -> &'a Path {
        cli.assets.as_deref().unwrap_or(&self.assets_dir)
    }
}

/// Environment source for `FUT_LISTEN_*` overrides
///
/// Nested keys use a double underscore: `FUT_LISTEN_SESSION__DELAY=8`.
/// `FUT_LISTEN_PLAYER__ARGS` is split on spaces.
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(" ")
        .with_list_parse_key("player.args")
        .try_parsing(true)
}

/// Asset directory installed alongside `exe`, if there is one
///
/// Looks next to the executable first, then in `../share/fut-listen/assets`
/// for a prefix install.
pub fn installed_assets_dir(exe: &Path) -> Option<PathBuf> {
    let bin_dir = exe.parent()?;
    let candidates = [
        bin_dir.join(ASSETS_DIR_NAME),
        bin_dir.join("../share/fut-listen").join(ASSETS_DIR_NAME),
    ];
    candidates.into_iter().find(|dir| dir.is_dir())
}

// Default values
fn default_assets_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| installed_assets_dir(&exe))
        .unwrap_or_else(|| PathBuf::from(".").join(ASSETS_DIR_NAME))
}

fn default_program() -> String {
    listen_audio_desktop::DEFAULT_PLAYER.to_string()
}

fn default_player_args() -> Vec<String> {
    listen_audio_desktop::MPV_ARGS
        .iter()
        .map(|arg| (*arg).to_string())
        .collect()
}

fn default_delay() -> u64 {
    10
}

fn default_repeat() -> u32 {
    1
}

fn default_reading_delay() -> u64 {
    15
}

fn default_ext() -> String {
    listen_importer::DEFAULT_EXTENSION.to_string()
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_player_args(),
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            repeat: default_repeat(),
            reading_delay: default_reading_delay(),
            ext: default_ext(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            player: PlayerSettings::default(),
            session: SessionDefaults::default(),
        }
    }
}
