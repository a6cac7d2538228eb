//! Fixed-delay retry for eventually-consistent reads.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How often and how far apart an operation is retried.
///
/// `retries` counts the additional attempts after the first one, so an
/// operation runs at most `retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_RETRIES: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    pub fn fixed(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self::fixed(0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_RETRIES, Self::DEFAULT_DELAY)
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted.
///
/// Sleeps `policy.delay` between attempts, never before the first or after
/// the last. On exhaustion the error of the last attempt is returned.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %e, "Retries exhausted");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "Attempt failed, retrying");
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
