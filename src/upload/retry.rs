use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use super::rate_limit::RateLimiter;
use crate::{PublishError, Result};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, the first try included.
    pub max_retries: u32,
    /// Delay before the second attempt; doubled before each later one.
    pub base_delay: Duration,
}

impl RetryConfig {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Runs `operation` up to `max_retries` times with exponential backoff.
/// Every attempt passes through the rate limiter first. Non-retryable
/// errors surface immediately; exhausting all attempts wraps the last
/// failure in `RetriesExhausted`.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    limiter: &RateLimiter,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.max_retries.max(1);
    let mut last_error = None;
    for attempt in 1..=attempts {
        if attempt > 1 {
            sleep(config.base_delay * 2u32.saturating_pow(attempt - 2)).await;
        }
        limiter.acquire().await;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                warn!(attempt, max = attempts, error = %e, "attempt failed");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    let source = last_error.unwrap_or_else(|| PublishError::Network {
        status: None,
        message: "no attempt was executed".to_string(),
    });
    Err(PublishError::RetriesExhausted {
        attempts,
        source: Box::new(source),
    })
}
