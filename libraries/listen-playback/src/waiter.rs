//! Timed waits with a late warning cue
//!
//! A wait is one deadline-driven loop: it sleeps until the next checkpoint
//! (progress tick, cue time or deadline), and at the cue checkpoint starts the
//! low tone in the background. The tone never moves the deadline.

use crate::events::{SessionEvent, SessionReporter};
use crate::service::PlaybackService;
use crate::types::WarningTone;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Seconds before the end of a wait at which the low tone fires
pub const CUE_LEAD_SECONDS: u64 = 3;

/// Interval between progress reports
const TICK: Duration = Duration::from_secs(1);

/// Stand-in for lengths past what the clock can represent
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Instant `length` after `start`, capped when the sum would overflow
pub(crate) fn deadline_after(start: Instant, length: Duration) -> Instant {
    start
        .checked_add(length)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Suspends the session for a number of seconds
pub struct Waiter {
    service: Arc<dyn PlaybackService>,
    reporter: Arc<dyn SessionReporter>,
    cue: PathBuf,
}

impl Waiter {
    /// Create a waiter that plays `cue` near the end of toned waits
    pub fn new(
        service: Arc<dyn PlaybackService>,
        reporter: Arc<dyn SessionReporter>,
        cue: PathBuf,
    ) -> Self {
        Self {
            service,
            reporter,
            cue,
        }
    }

    /// Wait for `seconds` wall-clock seconds
    ///
    /// With `tone_enabled`, the low tone starts once at
    /// `seconds - min(3, seconds)` elapsed and overlaps the rest of the wait.
    /// A zero-length wait returns immediately without events.
    ///
    /// Returns whether the tone cue was fired.
    pub async fn wait(&self, seconds: u64, tone_enabled: bool) -> bool {
        if seconds == 0 {
            return false;
        }

        self.reporter.report(SessionEvent::WaitStarted {
            seconds,
            tone_enabled,
        });

        let start = Instant::now();
        let total = Duration::from_secs(seconds);
        let deadline = deadline_after(start, total);
        let lead = Duration::from_secs(seconds.min(CUE_LEAD_SECONDS));
        let mut cue_at = tone_enabled.then(|| deadline - lead);
        let mut next_tick = start + TICK;
        let mut fired = false;

        loop {
            let checkpoint = cue_at.map_or(next_tick, |at| at.min(next_tick)).min(deadline);
            tokio::time::sleep_until(checkpoint).await;
            let now = Instant::now();

            if cue_at.is_some_and(|at| now >= at) {
                cue_at = None;
                self.fire_cue();
                fired = true;
            }

            if now >= deadline {
                self.reporter.report(SessionEvent::WaitProgress {
                    elapsed: seconds,
                    seconds,
                });
                break;
            }

            if now >= next_tick {
                self.reporter.report(SessionEvent::WaitProgress {
                    elapsed: (now - start).as_secs(),
                    seconds,
                });
                next_tick += TICK;
            }
        }

        self.reporter.report(SessionEvent::WaitFinished);
        fired
    }

    /// Start the low tone without waiting for it
    fn fire_cue(&self) {
        tracing::debug!("Firing wait cue {}", self.cue.display());
        self.reporter.report(SessionEvent::ToneCue {
            tone: WarningTone::A5,
            blocking: false,
        });

        let service = Arc::clone(&self.service);
        let cue = self.cue.clone();
        tokio::spawn(async move {
            let result = match service.spawn(&cue).await {
                Ok(mut task) => task.wait().await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!("Wait cue {} failed: {}", cue.display(), e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use crate::events::NullReporter;
    use crate::service::MockPlaybackService;

    fn waiter(service: MockPlaybackService) -> Waiter {
        Waiter::new(
            Arc::new(service),
            Arc::new(NullReporter),
            PathBuf::from("/assets/A5.mp3"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn zero_seconds_returns_immediately() {
        let mut service = MockPlaybackService::new();
        service.expect_spawn().never();

        let start = Instant::now();
        let fired = waiter(service).wait(0, true).await;

        assert!(!fired);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_cue_does_not_extend_wait() {
        let mut service = MockPlaybackService::new();
        service
            .expect_spawn()
            .times(1)
            .returning(|_| Err(PlaybackError::Invocation("no audio device".into())));

        let start = Instant::now();
        let fired = waiter(service).wait(6, true).await;

        assert!(fired);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn untoned_wait_never_touches_player() {
        let mut service = MockPlaybackService::new();
        service.expect_spawn().never();

        let start = Instant::now();
        let fired = waiter(service).wait(4, false).await;

        assert!(!fired);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_wait_is_capped_instead_of_overflowing() {
        let mut service = MockPlaybackService::new();
        service.expect_spawn().never();

        let waiter = waiter(service);
        let outcome =
            tokio::time::timeout(Duration::from_secs(10), waiter.wait(u64::MAX, true)).await;

        assert!(outcome.is_err(), "wait should still be running");
    }

    #[test]
    fn deadline_saturates_at_far_future() {
        let start = Instant::now();
        assert_eq!(
            deadline_after(start, Duration::from_secs(30)),
            start + Duration::from_secs(30)
        );
        assert_eq!(deadline_after(start, Duration::MAX), start + FAR_FUTURE);
    }
}
