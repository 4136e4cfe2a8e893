//! Retry policy — failure classification and exponential backoff.
//!
//! Pure, stateless logic: classification decides whether a failure is worth
//! another attempt, `delay_for` computes the wait, and `with_retry` runs the
//! attempts strictly sequentially.

use std::time::Duration;

/// Backoff parameters, supplied per call-site.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempt budget, including the first call. Must be >= 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Must be > 1 for the backoff to grow.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    /// 3 attempts, 1s base, 10s cap, doubling.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

/// Transport-level codes that indicate a transient condition.
const RETRYABLE_CODES: &[&str] = &[
    "connection_reset",
    "connection_refused",
    "timeout",
    "name_resolution_failed",
    "network_unreachable",
    "rate_limit_exceeded",
    "insufficient_quota",
    "server_error",
    "service_unavailable",
];

const RETRYABLE_STATUSES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// Semantic error-type tags some APIs attach to the response body.
const RETRYABLE_TYPES: &[&str] = &["server_error", "rate_limit_exceeded"];

/// A failure of the underlying transport call, carrying whatever
/// classification hints the transport exposed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    /// Transport-level code (connection_reset, timeout, ...).
    pub code: Option<String>,
    /// HTTP-like status, when the request reached the server.
    pub status: Option<u16>,
    /// Semantic error-type tag from the response body.
    pub error_type: Option<String>,
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            status: None,
            error_type: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Classify: transport code first, else HTTP status, else the semantic
    /// type tag. A failure carrying none of the three is not retryable.
    pub fn is_retryable(&self) -> bool {
        if let Some(code) = &self.code {
            return RETRYABLE_CODES.contains(&code.as_str());
        }
        if let Some(status) = self.status {
            return RETRYABLE_STATUSES.contains(&status);
        }
        if let Some(t) = &self.error_type {
            return RETRYABLE_TYPES.contains(&t.as_str());
        }
        false
    }
}

/// Implemented by error types that `with_retry` can classify.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        TransportError::is_retryable(self)
    }
}

/// Backoff before the next attempt after attempt `attempt` (1-based) failed:
/// `min(max_delay, base_delay * multiplier^(attempt - 1))`.
pub fn delay_for(attempt: u32, config: &RetryConfig) -> Duration {
    let exp = config
        .backoff_multiplier
        .powi(attempt.saturating_sub(1) as i32);
    let millis = config.base_delay.as_millis() as f64 * exp;
    config.max_delay.min(Duration::from_millis(millis as u64))
}

/// Run `operation` up to `config.max_attempts` times. A non-retryable failure
/// or an exhausted budget propagates the last failure; otherwise the task
/// sleeps the computed backoff and tries again. Attempts are strictly
/// sequential.
pub async fn with_retry<T, E, F, Fut>(mut operation: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt >= config.max_attempts {
                    return Err(err);
                }
                let delay = delay_for(attempt, config);
                tracing::warn!(
                    "⚠️ Attempt {attempt} failed, retrying in {}ms: {err}",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn delay_is_non_decreasing_and_capped() {
        let config = RetryConfig::default();
        let mut prev = Duration::ZERO;
        for attempt in 1..=10 {
            let d = delay_for(attempt, &config);
            assert!(d >= prev, "delay shrank at attempt {attempt}");
            assert!(d <= config.max_delay);
            prev = d;
        }
        assert_eq!(delay_for(1, &config), Duration::from_secs(1));
        assert_eq!(delay_for(2, &config), Duration::from_secs(2));
        assert_eq!(delay_for(5, &config), Duration::from_secs(10));
    }

    #[test]
    fn bare_error_is_not_retryable() {
        assert!(!TransportError::new("boom").is_retryable());
    }

    #[test]
    fn code_takes_precedence_over_status() {
        // A non-retryable code short-circuits even with a retryable status.
        let err = TransportError::new("boom").with_code("bad_request").with_status(503);
        assert!(!err.is_retryable());
        let err = TransportError::new("boom").with_code("timeout");
        assert!(err.is_retryable());
    }

    #[test]
    fn retryable_statuses_and_types() {
        for status in [408u16, 429, 500, 502, 503, 504] {
            assert!(TransportError::new("x").with_status(status).is_retryable());
        }
        assert!(!TransportError::new("x").with_status(400).is_retryable());
        assert!(TransportError::new("x").with_error_type("server_error").is_retryable());
        assert!(!TransportError::new("x").with_error_type("invalid_request").is_retryable());
    }

    #[tokio::test]
    async fn retries_up_to_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TransportError> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(TransportError::new("down").with_status(503)) }
            },
            &fast_config(),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_fatal_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TransportError> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(TransportError::new("no hints")) }
            },
            &fast_config(),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, TransportError> = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 1 {
                        Err(TransportError::new("flaky").with_code("connection_reset"))
                    } else {
                        Ok(42)
                    }
                }
            },
            &fast_config(),
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
