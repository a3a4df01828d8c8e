//! Integration tests for layered settings
//!
//! Environment overrides are injected through `config::Environment::source`
//! so tests never touch the process environment.

use fut_listen::config::{environment, Settings};
use fut_listen::AppError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ===== Helpers =====

fn env(vars: &[(&str, &str)]) -> config::Environment {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    environment().source(Some(map))
}

fn write_settings(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("fut-listen.toml");
    fs::write(&path, contents).unwrap();
    path
}

// ===== Loading =====

#[test]
fn test_file_values_are_used() {
    let temp = TempDir::new().unwrap();
    let path = write_settings(
        temp.path(),
        r#"
assets_dir = "/srv/fut/assets"

[player]
program = "ffplay"
args = ["-nodisp", "-autoexit"]

[session]
delay = 12
repeat = 2
"#,
    );

    let settings = Settings::load_with_env(Some(&path), env(&[])).unwrap();

    assert_eq!(settings.assets_dir, PathBuf::from("/srv/fut/assets"));
    assert_eq!(settings.player.program, "ffplay");
    assert_eq!(settings.player.args, ["-nodisp", "-autoexit"]);
    assert_eq!(settings.session.delay, 12);
    assert_eq!(settings.session.repeat, 2);
    // untouched keys keep their defaults
    assert_eq!(settings.session.reading_delay, 15);
    assert_eq!(settings.session.ext, "mp3");
}

#[test]
fn test_environment_overrides_file() {
    let temp = TempDir::new().unwrap();
    let path = write_settings(
        temp.path(),
        r#"
[session]
delay = 12
"#,
    );

    let settings = Settings::load_with_env(
        Some(&path),
        env(&[
            ("FUT_LISTEN_SESSION__DELAY", "7"),
            ("FUT_LISTEN_PLAYER__PROGRAM", "/usr/local/bin/mpv"),
            ("FUT_LISTEN_PLAYER__ARGS", "--no-video --volume=80"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.session.delay, 7);
    assert_eq!(settings.player.program, "/usr/local/bin/mpv");
    assert_eq!(settings.player.args, ["--no-video", "--volume=80"]);
}

#[test]
fn test_missing_explicit_file_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    let err = Settings::load_with_env(Some(&path), env(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = write_settings(temp.path(), "[session]\ndelay = \"soon\"\n");

    let err = Settings::load_with_env(Some(&path), env(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn test_empty_player_from_environment_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_settings(temp.path(), "");

    let err =
        Settings::load_with_env(Some(&path), env(&[("FUT_LISTEN_PLAYER__PROGRAM", "")]))
            .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}
