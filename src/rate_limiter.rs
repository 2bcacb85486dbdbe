use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::app::ports::ClockPort;

#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Minimum spacing between the start of two requests.
    pub min_interval: Duration,
}

/// Leaky bucket with room for a single request: each `acquire` waits until
/// `min_interval` has passed since the previous one was granted.
pub struct RateLimiter {
    limits: Limits,
    clock: Arc<dyn ClockPort>,
    last_granted: Mutex<Option<Duration>>,
}

impl RateLimiter {
    pub fn new(limits: Limits, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            limits,
            clock,
            last_granted: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) {
        // Held across the sleep so concurrent callers queue up behind each other
        let mut last = self.last_granted.lock().await;
        if let Some(previous) = *last {
            let elapsed = self.clock.now().saturating_sub(previous);
            if elapsed < self.limits.min_interval {
                self.clock.sleep(self.limits.min_interval - elapsed).await;
            }
        }
        *last = Some(self.clock.now());
    }
}
