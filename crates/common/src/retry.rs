//! Retry-until-stable executor
//!
//! Wraps exactly one idempotent remote call. Transient failures are retried
//! with exponential backoff until the call succeeds or the wall-clock budget
//! would be exceeded by the next wait; permanent failures surface at once.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::error::{Error, ErrorClass, Result};

/// Default budget for reads.
pub const READ_TIMEOUT: Duration = Duration::from_secs(3 * 60);
/// Default budget for writes.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A retry budget for one operation invocation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Vendor codes retried for this call only, on top of the global table.
    pub extra_retryable: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: WRITE_TIMEOUT,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            extra_retryable: Vec::new(),
        }
    }
}

impl RetryPolicy {
    pub fn read() -> Self {
        Self {
            timeout: READ_TIMEOUT,
            ..Self::default()
        }
    }

    pub fn write() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration, multiplier: f64) -> Self {
        self.initial_interval = initial;
        self.max_interval = max;
        self.multiplier = multiplier;
        self
    }

    pub fn with_retryable_codes(mut self, codes: &[&str]) -> Self {
        self.extra_retryable
            .extend(codes.iter().map(|code| code.to_string()));
        self
    }

    fn next_interval(&self, current: Duration) -> Duration {
        let next = current.mul_f64(self.multiplier.max(1.0));
        next.min(self.max_interval)
    }
}

/// Run `f` under `policy`, retrying transient errors.
///
/// Before each wait the executor checks whether `elapsed + next_wait` would
/// pass the budget; if so it gives up with [`Error::DeadlineExceeded`]
/// carrying the last error and the number of attempts made.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let extra: Vec<&str> = policy.extra_retryable.iter().map(String::as_str).collect();
    let start = Instant::now();
    let mut wait = policy.initial_interval;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let err = match f().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(operation, attempts, "Operation stabilised after retries");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if err.class_with(&extra) == ErrorClass::Permanent {
            return Err(err);
        }

        let elapsed = start.elapsed();
        if elapsed + wait > policy.timeout {
            warn!(
                operation,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Retry budget exhausted: {}",
                err
            );
            return Err(Error::DeadlineExceeded {
                attempts,
                elapsed,
                last: Box::new(err),
            });
        }

        warn!(
            operation,
            attempt = attempts,
            wait_ms = wait.as_millis() as u64,
            "Transient error, retrying: {}",
            err
        );
        sleep(wait).await;
        wait = policy.next_interval(wait);
    }
}
