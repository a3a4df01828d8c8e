/// External player process - wraps mpv (or any CLI player) as a playback service
use crate::error::{AudioError, Result};
use crate::probe::probe_duration;
use async_trait::async_trait;
use listen_playback::{PlaybackService, PlaybackTask};
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};

/// Player used when nothing else is configured
pub const DEFAULT_PLAYER: &str = "mpv";

/// Arguments that make mpv play audio headless and silently
pub const MPV_ARGS: &[&str] = &["--no-video", "--no-terminal"];

/// Plays files by running a command-line player, one process per file
///
/// Every process is spawned with `kill_on_drop`, so dropping a playback
/// future or task stops the audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPlayer {
    program: String,
    args: Vec<String>,
}

impl Default for ProcessPlayer {
    fn default() -> Self {
        Self::mpv()
    }
}

impl ProcessPlayer {
    /// Player running `program <path>` with no extra arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// mpv with headless audio-only arguments
    pub fn mpv() -> Self {
        Self::new(DEFAULT_PLAYER).with_args(MPV_ARGS.iter().copied())
    }

    /// Arguments placed before the file path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the file path
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn launch(&self, path: &Path) -> Result<Child> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Launching {} {}", self.program, path.display());
        self.command(path)
            .spawn()
            .map_err(|e| self.launch_error(e))
    }

    fn launch_error(&self, err: std::io::Error) -> AudioError {
        if err.kind() == std::io::ErrorKind::NotFound {
            AudioError::PlayerUnavailable {
                program: self.program.clone(),
                reason: err.to_string(),
            }
        } else {
            AudioError::Io(err)
        }
    }
}

async fn wait_for_exit(child: Child) -> Result<()> {
    let output = child.wait_with_output().await?;
    check_exit(&output)
}

fn check_exit(output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(AudioError::PlayerFailed {
        status: output.status.to_string(),
        stderr: stderr.trim().to_string(),
    })
}

#[async_trait]
impl PlaybackService for ProcessPlayer {
    async fn ensure_available(&self) -> listen_playback::Result<()> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| AudioError::PlayerUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(AudioError::PlayerUnavailable {
                program: self.program.clone(),
                reason: format!("`{} --version` exited with {}", self.program, status),
            }
            .into());
        }

        tracing::debug!("Player {} is available", self.program);
        Ok(())
    }

    async fn play(&self, path: &Path) -> listen_playback::Result<()> {
        let child = self.launch(path)?;
        wait_for_exit(child).await?;
        Ok(())
    }

    async fn spawn(&self, path: &Path) -> listen_playback::Result<PlaybackTask> {
        let child = self.launch(path)?;
        Ok(PlaybackTask::spawn(async move {
            wait_for_exit(child).await.map_err(Into::into)
        }))
    }

    async fn duration(&self, path: &Path) -> listen_playback::Result<Option<Duration>> {
        let path: PathBuf = path.to_path_buf();
        let probed = tokio::task::spawn_blocking(move || probe_duration(&path))
            .await
            .map_err(|e| AudioError::Probe(format!("probe task failed: {e}")))?;
        Ok(probed?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn mpv_is_the_default_player() {
        let player = ProcessPlayer::default();
        assert_eq!(player.program(), "mpv");
        assert_eq!(player.args(), ["--no-video", "--no-terminal"]);
    }

    #[test]
    fn command_puts_path_after_arguments() {
        let player = ProcessPlayer::new("ffplay").with_args(["-nodisp", "-autoexit"]);
        let cmd = player.command(Path::new("/audio/01.mp3"));
        let std_cmd = cmd.as_std();

        assert_eq!(std_cmd.get_program(), OsStr::new("ffplay"));
        let args: Vec<&OsStr> = std_cmd.get_args().collect();
        assert_eq!(
            args,
            [
                OsStr::new("-nodisp"),
                OsStr::new("-autoexit"),
                OsStr::new("/audio/01.mp3")
            ]
        );
    }

    #[test]
    fn missing_file_is_rejected_before_launch() {
        let player = ProcessPlayer::new("definitely-not-a-player");
        let err = player.launch(Path::new("/no/such/file.mp3")).unwrap_err();
        assert!(matches!(err, AudioError::FileNotFound(_)));
    }
}
