//! Session sequencer - core orchestration
//!
//! Drives one listening session: start announcement, then for every file the
//! announcements, reading pause and `repeat + 1` plays with their tones and
//! waits, then the end announcement.
//!
//! External invocation failures (a missing asset, a player that exits
//! non-zero, an unreadable duration) are logged and skipped. Only a file that
//! vanished since resolution, or a broken prompt, stops the session.

use crate::announcements::{Announcement, AnnouncementLibrary};
use crate::error::{PlaybackError, Result};
use crate::events::{SessionEvent, SessionReporter};
use crate::service::{PlaybackService, PlaybackTask, Prompter};
use crate::types::{Phase, RunConfiguration, SessionSummary, WarningTone};
use crate::waiter::{deadline_after, Waiter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Pause after the start announcement
pub const START_SETTLE: Duration = Duration::from_secs(1);

/// Interval between playback progress reports
const PROGRESS_TICK: Duration = Duration::from_secs(1);

/// Runs listening sessions against a playback service
pub struct Sequencer {
    service: Arc<dyn PlaybackService>,
    prompter: Arc<dyn Prompter>,
    reporter: Arc<dyn SessionReporter>,
    library: AnnouncementLibrary,
    waiter: Waiter,
}

impl Sequencer {
    /// Create a sequencer
    pub fn new(
        service: Arc<dyn PlaybackService>,
        prompter: Arc<dyn Prompter>,
        reporter: Arc<dyn SessionReporter>,
        library: AnnouncementLibrary,
    ) -> Self {
        let waiter = Waiter::new(
            Arc::clone(&service),
            Arc::clone(&reporter),
            library.tone(WarningTone::A5),
        );

        Self {
            service,
            prompter,
            reporter,
            library,
            waiter,
        }
    }

    /// Run a full session
    ///
    /// # Errors
    ///
    /// Fails with [`PlaybackError::FileVanished`] when a session file is gone
    /// at the moment it is needed, or with [`PlaybackError::Prompt`] when a
    /// confirmation cannot be read. Player failures never surface here.
    pub async fn run(&self, config: &RunConfiguration) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        tracing::info!(
            "Starting session: {} file(s), {} play(s) each",
            config.files.len(),
            config.plays_per_file()
        );

        if !config.no_start && config.announcements_enabled() {
            self.enter(Phase::Start);
            self.announce(Announcement::Start, &mut summary).await;
            tokio::time::sleep(START_SETTLE).await;
        }

        let total = config.files.len();
        for (index, path) in config.files.iter().enumerate() {
            self.visit_file(config, index + 1, total, path, &mut summary).await?;
        }

        if !config.no_end && config.announcements_enabled() {
            self.enter(Phase::End);
            self.announce(Announcement::End, &mut summary).await;
        }

        tracing::info!(
            "Session finished: {} play(s), {} degraded invocation(s)",
            summary.plays,
            summary.degraded
        );
        Ok(summary)
    }

    async fn visit_file(
        &self,
        config: &RunConfiguration,
        number: usize,
        total: usize,
        path: &Path,
        summary: &mut SessionSummary,
    ) -> Result<()> {
        ensure_present(path)?;
        summary.files += 1;

        self.reporter.report(SessionEvent::FileStarted {
            number,
            total,
            path: path.to_path_buf(),
        });

        let plays = config.plays_per_file();

        if config.announcements_enabled() {
            self.announce(Announcement::ListeningNumber(number), summary)
                .await;
            self.announce(Announcement::PlayCount(plays), summary).await;
        }

        if config.reading_pause_enabled() {
            self.enter(Phase::ReadingPause);
            self.announce(Announcement::ReadQuestions, summary).await;
            if config.confirm_before {
                self.confirm(Phase::ReadingPause).await?;
            } else {
                self.waiter
                    .wait(config.reading_delay, config.wait_tone_enabled())
                    .await;
            }
        }

        for play in 1..=plays {
            if config.confirm_before {
                self.confirm(Phase::Playback).await?;
            } else if config.pre_play_tone_enabled() {
                self.enter(Phase::PrePlayTone);
                self.play_tone(summary).await;
            }

            self.enter(Phase::Playback);
            self.play_track(path, play, plays, summary).await?;

            if !config.confirm_before {
                self.enter(Phase::PostDelay);
                self.waiter
                    .wait(config.delay, config.wait_tone_enabled())
                    .await;
            }
        }

        self.reporter.report(SessionEvent::FileFinished { number });
        Ok(())
    }

    fn enter(&self, phase: Phase) {
        tracing::debug!("Entering phase {:?}", phase);
        self.reporter.report(SessionEvent::PhaseStarted { phase });
    }

    async fn announce(&self, announcement: Announcement, summary: &mut SessionSummary) {
        let Some(asset) = self.library.announcement(announcement) else {
            tracing::warn!("No rendered asset for {:?}, skipping", announcement);
            summary.degraded += 1;
            return;
        };

        if let Err(e) = self.service.play(&asset).await {
            tracing::warn!("Announcement {} failed: {}", asset.display(), e);
            summary.degraded += 1;
        }
        self.reporter.report(SessionEvent::AnnouncementPlayed { announcement });
    }

    async fn play_tone(&self, summary: &mut SessionSummary) {
        let tone = self.library.tone(WarningTone::E6);
        self.reporter.report(SessionEvent::ToneCue {
            tone: WarningTone::E6,
            blocking: true,
        });
        if let Err(e) = self.service.play(&tone).await {
            tracing::warn!("Warning tone {} failed: {}", tone.display(), e);
            summary.degraded += 1;
        }
    }

    async fn confirm(&self, phase: Phase) -> Result<()> {
        self.reporter.report(SessionEvent::ConfirmationRequested { phase });
        self.prompter.confirm_continue().await
    }

    async fn play_track(
        &self,
        path: &Path,
        play: u32,
        plays: u32,
        summary: &mut SessionSummary,
    ) -> Result<()> {
        ensure_present(path)?;

        let duration = match self.service.duration(path).await {
            Ok(duration) => duration.filter(|d| !d.is_zero()),
            Err(e) => {
                tracing::warn!("Could not probe {}: {}", path.display(), e);
                summary.degraded += 1;
                None
            }
        };

        summary.plays += 1;
        self.reporter.report(SessionEvent::PlaybackStarted {
            path: path.to_path_buf(),
            play,
            plays,
            duration,
        });

        match self.service.spawn(path).await {
            Ok(task) => {
                if let Err(e) = self.follow_playback(task, path, duration).await {
                    tracing::warn!("Playback of {} failed: {}", path.display(), e);
                    self.report_failure(path, &e);
                    summary.degraded += 1;
                }
            }
            Err(e) => {
                tracing::warn!("Could not start {}: {}", path.display(), e);
                self.report_failure(path, &e);
                summary.degraded += 1;
            }
        }

        self.reporter.report(SessionEvent::PlaybackFinished {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    /// Report progress for a running playback
    ///
    /// With a known duration, progress follows wall time and the playback is
    /// considered done when the duration has elapsed, whether or not the
    /// player has actually exited. A player still running at that point is
    /// handed to [`Sequencer::watch_late_exit`]. Without a duration, progress
    /// is indeterminate and ends when the player exits.
    async fn follow_playback(
        &self,
        mut task: PlaybackTask,
        path: &Path,
        duration: Option<Duration>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut ticker = tokio::time::interval_at(start + PROGRESS_TICK, PROGRESS_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let Some(total) = duration else {
            return loop {
                tokio::select! {
                    result = task.wait() => break result,
                    _ = ticker.tick() => self.report_progress(start, None),
                }
            };
        };

        let deadline = tokio::time::sleep_until(deadline_after(start, total));
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                () = &mut deadline => break,
                _ = ticker.tick() => self.report_progress(start, duration),
            }
        }
        self.reporter.report(SessionEvent::PlaybackProgress {
            elapsed: total,
            duration,
        });

        if task.is_finished() {
            task.wait().await
        } else {
            self.watch_late_exit(task, path);
            Ok(())
        }
    }

    /// Let a player outlive its known duration and log how it ends
    ///
    /// The watcher owns the task, so the player is still killed when the
    /// runtime shuts down.
    fn watch_late_exit(&self, mut task: PlaybackTask, path: &Path) {
        let reporter = Arc::clone(&self.reporter);
        let path = path.to_path_buf();
        tokio::spawn(async move {
            if let Err(e) = task.wait().await {
                tracing::warn!(
                    "Playback of {} failed after its expected end: {}",
                    path.display(),
                    e
                );
                reporter.report(SessionEvent::PlaybackFailed {
                    path,
                    reason: e.to_string(),
                });
            }
        });
    }

    fn report_failure(&self, path: &Path, error: &PlaybackError) {
        self.reporter.report(SessionEvent::PlaybackFailed {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }

    fn report_progress(&self, start: Instant, duration: Option<Duration>) {
        self.reporter.report(SessionEvent::PlaybackProgress {
            elapsed: start.elapsed(),
            duration,
        });
    }
}

fn ensure_present(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PlaybackError::FileVanished(path.to_path_buf()))
    }
}
