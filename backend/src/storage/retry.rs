//! Bounded retry with a per-attempt timeout for storage calls.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2_000),
            max_attempts: 2,
            backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// Each attempt is cut off after `timeout`. The error of the last attempt is returned,
    /// with `label` and the attempt count as context.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = anyhow!("{} was not attempted", label);

        for attempt in 1..=attempts {
            let outcome = match tokio::time::timeout(self.timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!("timed out after {}ms", self.timeout.as_millis())),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            "{} failed (attempt {}/{}): {:#}. Retrying in {}ms",
                            label,
                            attempt,
                            attempts,
                            e,
                            self.backoff.as_millis()
                        );
                        tokio::time::sleep(self.backoff).await;
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error.context(format!("{} failed after {} attempt(s)", label, attempts)))
    }
}
