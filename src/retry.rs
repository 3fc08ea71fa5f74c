//! Fixed-delay retry wrapper shared by listing and detail fetches.

use crate::config::Config;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (at least 1)
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay }
    }

    /// Builds the policy from the configured attempt count and delay.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.retry_delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Runs `operation` until it succeeds or the policy runs out of attempts.
///
/// Every failure is logged with its attempt number. The delay is slept
/// between attempts only, never after the last one. The returned error is
/// the last failure.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(
                    "Error fetching {} (attempt {}/{}): {:#}",
                    what, attempt, policy.max_attempts, e
                );

                if attempt >= policy.max_attempts {
                    return Err(e.context(format!(
                        "Giving up on {} after {} attempts",
                        what, policy.max_attempts
                    )));
                }

                if !policy.delay.is_zero() {
                    debug!("Retrying in {}ms", policy.delay.as_millis());
                    tokio::time::sleep(policy.delay).await;
                }

                attempt += 1;
            }
        }
    }
}
