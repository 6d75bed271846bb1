//! Global request spacing for the portal.
//!
//! The portal is a single capacity-constrained host, so spacing is enforced
//! across all outgoing requests rather than per destination.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive requests.
///
/// The lock is held while sleeping, so callers on different threads are
/// serialized and can never start closer together than `min_interval`.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until a request may be sent, then record it as sent.
    ///
    /// Returns the instant recorded for this request.
    pub fn acquire(&self) -> Instant {
        // A poisoned lock only means another caller panicked mid-sleep; the
        // timestamp itself is still valid.
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limit, sleeping");
                thread::sleep(wait);
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }
}
