//! Bounded polling for runs created by fire-and-forget dispatch endpoints.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{
    PluginError,
    PluginResult,
};

/// Poll schedule used to detect a freshly dispatched run.
///
/// Some providers accept a dispatch asynchronously and return no run id, so
/// the only signal that the run materialized is observable state changing on
/// a subsequent poll. Delays start at `initial_delay` and grow as
/// `2*d + 1000ms` per attempt. The schedule is bounded: exhausting
/// `max_attempts` (or the optional wall-clock `deadline`) fails with
/// `DetectionTimeout` instead of polling forever.
pub struct DetectionPolicy {
    pub initial_delay: Duration,
    pub max_attempts: usize,
    /// Wall-clock cap across all waits.
    pub deadline: Option<Duration>,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(3000),
            max_attempts: 5,
            deadline: None,
        }
    }
}

impl DetectionPolicy {
    pub fn new(initial_delay: Duration, max_attempts: usize) -> Self {
        Self {
            initial_delay,
            max_attempts,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The full wait schedule: 3000, 7000, 15000, 31000, ... (ms).
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let mut next = self.initial_delay;
        std::iter::repeat_with(move || {
            let current = next;
            next = current * 2 + Duration::from_millis(1000);
            current
        })
        .take(self.max_attempts)
    }

    /// Waits out the schedule, running `probe` after each delay until it
    /// yields a value.
    ///
    /// Every wait races against `cancel`; a cancelled token aborts the loop
    /// with `PluginError::Cancelled`. Probe errors propagate immediately.
    pub async fn detect<T, F, Fut>(&self, cancel: &CancellationToken, mut probe: F) -> PluginResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = PluginResult<Option<T>>>,
    {
        let started = tokio::time::Instant::now();
        let mut attempts = 0;

        for delay in self.delays() {
            if let Some(deadline) = self.deadline {
                if started.elapsed() + delay > deadline {
                    break;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(PluginError::Cancelled("run detection aborted".to_string()));
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempts += 1;
            if let Some(found) = probe().await? {
                debug!(attempts, "new run detected");
                return Ok(found);
            }
        }

        Err(PluginError::DetectionTimeout {
            attempts,
            waited_ms: started.elapsed().as_millis() as u64,
        })
    }
}
