//! Request Pacing
//!
//! Converts a requests-per-minute budget into a minimum spacing between the
//! *starts* of consecutive remote calls. A slow response absorbs part or all
//! of the wait.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use usecase_mapper_core::EngineSettings;

/// Spacing enforcer for one run. Holds only the start of the last call.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call_started: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter for `rpm` requests per minute. `rpm` must be positive;
    /// `EngineSettings` guarantees that.
    pub fn new(rpm: f64) -> Self {
        let min_interval = Duration::try_from_secs_f64(60.0 / rpm).unwrap_or(Duration::MAX);
        Self {
            min_interval,
            last_call_started: None,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.rpm())
    }

    /// Minimum time between the starts of two calls.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// `max(0, min_interval - elapsed)` given the time since the previous call
    /// started.
    pub fn wait_for_elapsed(&self, elapsed: Duration) -> Duration {
        self.min_interval.saturating_sub(elapsed)
    }

    /// How long the next call must wait right now. Zero before the first call.
    pub fn pending_wait(&self) -> Duration {
        match self.last_call_started {
            Some(started) => self.wait_for_elapsed(started.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Suspend until the next call may start, then record its start time.
    pub async fn acquire(&mut self) {
        let wait = self.pending_wait();
        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "rate limit: waiting before next call");
            tokio::time::sleep(wait).await;
        }
        self.last_call_started = Some(Instant::now());
    }
}
