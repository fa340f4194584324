//! Retry logic for remote calls.
//!
//! Only timeouts are retried; any other failure aborts on the first
//! attempt and is surfaced to the caller. Backoff is linear: the delay
//! before the k-th re-attempt is `base_delay * k`. Bounded attempts, no
//! jitter — the point is to ride out a slow connection, not to hide
//! persistent failures.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts (1 means no retries).
    pub max_attempts: u32,
    /// Base delay; the wait before attempt k+1 is `base_delay * k`.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Create a retry config with a custom attempt budget.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// A single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(1)
    }

    /// Set the base delay.
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }
}

/// Execute an async operation, retrying timeouts with linear backoff.
///
/// Returns the first success, the first non-timeout error unchanged, or
/// the last timeout once the attempt budget is exhausted.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_timeout = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if e.is_transient() => {
                last_timeout = Some(e);
                if attempt < max_attempts {
                    let delay = config.base_delay * attempt;
                    warn!(
                        "{} timed out (attempt {}/{}), retrying in {:?}",
                        operation_name, attempt, max_attempts, delay
                    );
                    sleep(delay).await;
                }
            }
            // Non-timeout failures are not recoverable by retrying.
            Err(e) => return Err(e),
        }
    }

    Err(last_timeout
        .unwrap_or_else(|| Error::payload(format!("{operation_name} failed with no error"))))
}

/// Like [`with_retry`], but degrades every failure to `None`.
///
/// For call sites that must fail open ("treat as empty/unavailable")
/// rather than propagate. The error is logged, never raised past this
/// boundary.
pub async fn retry_or_none<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Option<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match with_retry(config, operation_name, operation).await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed, treating as unavailable: {}", operation_name, e);
            None
        }
    }
}
