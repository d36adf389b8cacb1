//! Retry with exponential backoff
//!
//! The booking engine never retries on its own. Callers that treat a
//! collaborator failure as retryable (the HTTP booking handler) wrap a
//! whole booking attempt with this helper, so every retry re-runs
//! validation and the availability check against fresh data.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl RetryConfig {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Execute an async operation with exponential backoff retry.
///
/// `should_retry` decides whether an error is transient. Permanent errors
/// (validation, slot conflicts) are returned immediately.
///
/// ```ignore
/// let reservation = retry_with_backoff(
///     RetryConfig::with_attempts(3),
///     || coordinator.run_booking(&request, Utc::now()),
///     |rejection| rejection.is_retryable(),
///     "run_booking",
/// ).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: RetryConfig,
    mut operation: F,
    should_retry: impl Fn(&E) -> bool,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt >= max_attempts || !should_retry(&err) {
                    if should_retry(&err) {
                        warn!(
                            operation = operation_name,
                            attempt,
                            max_attempts,
                            error = %err,
                            "Retries exhausted"
                        );
                    }
                    return Err(err);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );

                tokio::time::sleep(delay).await;

                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.backoff_multiplier)
                        .min(config.max_delay.as_secs_f64()),
                );
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff(
            fast(3),
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err("store unavailable".to_string())
                } else {
                    Ok(n)
                }
            },
            |_| true,
            "test",
        )
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            fast(5),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("slot conflict".to_string())
            },
            |_| false,
            "test",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            fast(2),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("store unavailable".to_string())
            },
            |_| true,
            "test",
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
