//! Client-side, per-action rate limiting
//!
//! Every API action gets its own sliding one-second window. A caller that
//! finds the window full sleeps until the oldest slot expires.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Default calls per second for one action.
pub const DEFAULT_RATE_LIMIT: u32 = 20;

#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    slots: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT)
    }
}

impl RateLimiter {
    /// A limit of zero disables limiting.
    pub fn new(per_second: u32) -> Self {
        Self {
            limit: per_second,
            window: Duration::from_secs(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Wait until `action` may be called, then claim a slot.
    pub async fn acquire(&self, action: &str) {
        if self.limit == 0 {
            return;
        }
        loop {
            let wait = {
                let mut slots = self.slots.lock();
                let window = slots.entry(action.to_string()).or_default();
                let now = Instant::now();
                while window
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.window)
                {
                    window.pop_front();
                }
                if window.len() < self.limit as usize {
                    window.push_back(now);
                    return;
                }
                match window.front() {
                    Some(oldest) => self.window - now.duration_since(*oldest),
                    None => Duration::ZERO,
                }
            };
            debug!(action, wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
            sleep(wait).await;
        }
    }
}
