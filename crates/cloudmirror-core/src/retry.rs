//! Retry policies for mutating provider calls
//!
//! Each per-item action (upload, download, delete, create folder) runs
//! under a policy. The default [`NoRetry`] performs exactly one attempt;
//! [`FixedBackoff`] sleeps a constant interval between attempts. Retries
//! never apply to cancellation: a cancelled error aborts immediately.

use std::time::Duration;

use crate::domain::errors::is_cancelled;

/// Decides how many attempts a mutating call gets and how long to wait
/// between them
pub trait RetryPolicy: Send + Sync {
    /// Maximum number of attempts, including the first (always >= 1)
    fn max_attempts(&self) -> u32;

    /// Delay before the given retry attempt (attempt numbering starts at 2)
    fn backoff(&self, attempt: u32) -> Duration;
}

/// Single attempt, no retries
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn max_attempts(&self) -> u32 {
        1
    }

    fn backoff(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Fixed number of attempts with a constant delay between them
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    attempts: u32,
    delay: Duration,
}

impl FixedBackoff {
    /// Creates a policy with `attempts` total tries and `delay` between them
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl RetryPolicy for FixedBackoff {
    fn max_attempts(&self) -> u32 {
        self.attempts
    }

    fn backoff(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

/// Runs an async operation under a retry policy
///
/// Returns the first success, or the last error once attempts are
/// exhausted. Cancellation errors are returned immediately without
/// consuming further attempts.
pub async fn with_retry<T, F, Fut>(policy: &dyn RetryPolicy, mut op: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let max = policy.max_attempts();
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_cancelled(&err) => return Err(err),
            Err(err) if attempt >= max => return Err(err),
            Err(err) => {
                tracing::debug!(attempt, error = %err, "operation failed, retrying");
                attempt += 1;
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
        }
    }
}
