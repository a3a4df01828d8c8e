//! Shared fixtures for sequencer and waiter tests
//!
//! The fake player records every invocation together with the (paused)
//! tokio clock, so tests can assert both ordering and timing.

#![allow(dead_code)]

use async_trait::async_trait;
use listen_playback::{
    AnnouncementLibrary, PlaybackService, PlaybackTask, Prompter, Result, SessionEvent,
    SessionReporter, Sequencer,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

pub const ASSETS: &str = "/assets";

/// One observable step of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Blocking playback (announcements, high tone)
    Play(String),
    /// Background playback (session files, low tone)
    Spawn(String),
    /// Manual confirmation
    Confirm,
    /// Timed wait of N seconds
    Wait(u64),
}

pub fn play(name: &str) -> Call {
    Call::Play(name.to_string())
}

pub fn spawn(name: &str) -> Call {
    Call::Spawn(name.to_string())
}

/// Shared call log with timestamps relative to harness creation
#[derive(Clone)]
pub struct CallLog {
    start: Instant,
    entries: Arc<Mutex<Vec<(Call, Duration)>>>,
    events: Arc<Mutex<Vec<SessionEvent>>>,
    finished_tracks: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
            events: Arc::new(Mutex::new(Vec::new())),
            finished_tracks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, call: Call) {
        self.entries
            .lock()
            .unwrap()
            .push((call, self.start.elapsed()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    pub fn timed(&self) -> Vec<(Call, Duration)> {
        self.entries.lock().unwrap().clone()
    }

    /// Seconds since harness start at which each matching call happened
    pub fn times_of(&self, call: &Call) -> Vec<u64> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == call)
            .map(|(_, at)| at.as_secs())
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.times_of(call).len()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Session files whose background playback ran to its end
    pub fn finished_tracks(&self) -> Vec<String> {
        self.finished_tracks.lock().unwrap().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Player that finishes instantly for assets and after `track_length` for files
pub struct FakePlayer {
    log: CallLog,
    track_length: Option<Duration>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl PlaybackService for FakePlayer {
    async fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn play(&self, path: &Path) -> Result<()> {
        self.log.push(Call::Play(file_name(path)));
        Ok(())
    }

    async fn spawn(&self, path: &Path) -> Result<PlaybackTask> {
        let name = file_name(path);
        self.log.push(Call::Spawn(name.clone()));
        let is_asset = path.starts_with(ASSETS);
        let length = if is_asset {
            Duration::from_millis(250)
        } else {
            self.track_length.unwrap_or(Duration::from_secs(1))
        };
        let finished = Arc::clone(&self.log.finished_tracks);
        Ok(PlaybackTask::spawn(async move {
            tokio::time::sleep(length).await;
            if !is_asset {
                finished.lock().unwrap().push(name);
            }
            Ok(())
        }))
    }

    async fn duration(&self, _path: &Path) -> Result<Option<Duration>> {
        Ok(self.track_length)
    }
}

/// Prompter that confirms immediately
pub struct FakePrompter {
    log: CallLog,
}

#[async_trait]
impl Prompter for FakePrompter {
    async fn confirm_continue(&self) -> Result<()> {
        self.log.push(Call::Confirm);
        Ok(())
    }
}

/// Reporter that keeps every event and logs waits as calls
pub struct RecordingReporter {
    log: CallLog,
}

impl SessionReporter for RecordingReporter {
    fn report(&self, event: SessionEvent) {
        if let SessionEvent::WaitStarted { seconds, .. } = event {
            self.log.push(Call::Wait(seconds));
        }
        self.log.events.lock().unwrap().push(event);
    }
}

/// Everything a sequencer test needs
pub struct Harness {
    pub log: CallLog,
    pub sequencer: Sequencer,
    pub service: Arc<FakePlayer>,
    pub reporter: Arc<RecordingReporter>,
    dir: TempDir,
}

impl Harness {
    /// Harness whose session files play for `track_length` (probe reports the same)
    pub fn new(track_length: Option<Duration>) -> Self {
        let log = CallLog::new();
        let service = Arc::new(FakePlayer {
            log: log.clone(),
            track_length,
        });
        let reporter = Arc::new(RecordingReporter { log: log.clone() });
        let prompter = Arc::new(FakePrompter { log: log.clone() });

        let sequencer = Sequencer::new(
            Arc::clone(&service) as Arc<dyn PlaybackService>,
            prompter,
            Arc::clone(&reporter) as Arc<dyn SessionReporter>,
            AnnouncementLibrary::new(ASSETS),
        );

        Self {
            log,
            sequencer,
            service,
            reporter,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Create session files `01.mp3`, `02.mp3`, ... on disk
    pub fn files(&self, count: usize) -> Vec<PathBuf> {
        (1..=count)
            .map(|n| {
                let path = self.dir.path().join(format!("{n:02}.mp3"));
                std::fs::write(&path, b"not really audio").unwrap();
                path
            })
            .collect()
    }
}
