//! Retry helpers for async operations.
//!
//! Used by the start-up poller and by transaction lookups, where the server
//! needs a few blocks before a hash becomes queryable.
//!
//! ```ignore
//! use localic_client::retry::{retry, RetryConfig};
//!
//! let height = retry(RetryConfig::fixed(1, 5), "get_height", || async {
//!     chain.get_height().await
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::consts::{DEFAULT_TX_LOOKUP_ATTEMPTS, DEFAULT_TX_LOOKUP_DELAY_SECS};

/// How many times to run an operation and how long to wait between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts. 0 means retry forever.
    pub max_attempts: u32,
    /// Wait between two attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::fixed(DEFAULT_TX_LOOKUP_DELAY_SECS, DEFAULT_TX_LOOKUP_ATTEMPTS)
    }
}

impl RetryConfig {
    pub fn fixed(delay_secs: u64, max_attempts: u32) -> Self {
        Self::fixed_duration(Duration::from_secs(delay_secs), max_attempts)
    }

    pub fn fixed_duration(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Longest time spent sleeping when every attempt fails.
    pub fn total_wait(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

/// Retry `operation` until it succeeds or the attempts run out, treating every
/// error as retryable. The last error is returned on exhaustion.
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_classifier(config, operation_name, operation, |_| true).await
}

/// Like [`retry`], but errors for which `is_retryable` returns false are
/// returned immediately.
pub async fn retry_with_classifier<F, Fut, T, E, C>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
    is_retryable: C,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E) -> bool,
{
    let mut attempt = 1u32;
    let max_attempts_str = if config.max_attempts == 0 {
        "∞".to_string()
    } else {
        config.max_attempts.to_string()
    };

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    debug!(operation = operation_name, error = %e, "Non-retryable error");
                    return Err(e);
                }

                if config.max_attempts > 0 && attempt >= config.max_attempts {
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts = config.max_attempts,
                        error = %e,
                        "Giving up after max attempts"
                    );
                    return Err(e);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = %max_attempts_str,
                    delay_ms = config.delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );

                tokio::time::sleep(config.delay).await;
                attempt += 1;
            }
        }
    }
}
