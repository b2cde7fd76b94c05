//! Generic retry policy with exponential backoff and jitter.
//!
//! Providers classify each failure as transient or permanent at the call
//! site; the policy only retries transient ones.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Whether a failed operation is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Network hiccup, timeout, rate limit, server error. Retry with backoff.
    Transient,
    /// Bad request, auth failure. Retrying will not help.
    Permanent,
}

/// An error together with its retry classification.
#[derive(Debug)]
pub struct ClassifiedError {
    pub class: RetryClass,
    pub error: anyhow::Error,
}

impl ClassifiedError {
    pub fn transient(error: anyhow::Error) -> Self {
        Self {
            class: RetryClass::Transient,
            error,
        }
    }

    pub fn permanent(error: anyhow::Error) -> Self {
        Self {
            class: RetryClass::Permanent,
            error,
        }
    }
}

/// Exponential backoff retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles after each retry.
    pub initial_backoff: Duration,
    /// Upper bound on the backoff between attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Runs `op`, retrying transient failures with exponential backoff and
    /// up to 500ms of jitter. Returns the last error once retries are
    /// exhausted, and permanent errors immediately.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, anyhow::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>>,
    {
        let mut retries = 0u32;
        let mut backoff = self.initial_backoff;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(failure) if failure.class == RetryClass::Transient
                    && retries < self.max_retries =>
                {
                    let jitter = Duration::from_millis(rand::random::<u64>() % 500);
                    let wait = backoff.min(self.max_backoff) + jitter;
                    warn!(
                        attempt = retries + 1,
                        max_retries = self.max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %failure.error,
                        "transient failure, backing off before retry"
                    );
                    tokio::time::sleep(wait).await;
                    backoff = (backoff * 2).min(self.max_backoff);
                    retries += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}
