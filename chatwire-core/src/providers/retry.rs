//! Retry policy for resilient provider operations
//!
//! Only backend API errors are candidates for a retry. Rate limits are
//! always retried and honor the backend's retry-after hint; server errors
//! are retried until the attempt budget is spent.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::providers::error::{ProviderError, ProviderResult};

/// Upper bound on attempts for a single call or stream open
pub const MAX_RETRIES: u32 = 8;

/// Outcome of classifying a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given delay, then try again
    Retry(Duration),
    /// Give up and surface the original error
    Fail,
    /// Give up and surface a "max retries reached" error wrapping the original
    Exhausted,
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        matches!(self, RetryDecision::Retry(_))
    }

    /// Delay in milliseconds, zero unless retrying
    pub fn delay_millis(&self) -> u64 {
        match self {
            RetryDecision::Retry(delay) => delay.as_millis() as u64,
            _ => 0,
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_retries: u32,

    /// Delay before the first retry; doubles on every attempt
    pub initial_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            initial_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff for the given zero-based attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }

    /// Classify a failed attempt
    pub fn decide(&self, attempt: u32, error: &ProviderError) -> RetryDecision {
        let ProviderError::Api {
            status,
            retry_after,
            ..
        } = error
        else {
            return RetryDecision::Fail;
        };

        match *status {
            429 => RetryDecision::Retry(retry_after.unwrap_or_else(|| self.backoff(attempt))),
            500..=599 => {
                if attempt >= self.max_retries.saturating_sub(1) {
                    RetryDecision::Exhausted
                } else {
                    RetryDecision::Retry(self.backoff(attempt))
                }
            }
            _ => RetryDecision::Fail,
        }
    }

    /// Run `operation` until it succeeds, the policy gives up, the attempt
    /// budget is spent, or `cancel` fires.
    ///
    /// Both the operation and the sleeps between attempts are raced against
    /// the cancellation token.
    pub async fn execute<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        label: &str,
        mut operation: F,
    ) -> ProviderResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let delay = match self.decide(attempt, &error) {
                RetryDecision::Retry(delay) => delay,
                RetryDecision::Fail => return Err(error),
                RetryDecision::Exhausted => return Err(ProviderError::max_retries(error)),
            };

            info!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying {}",
                label
            );
            last_error = Some(error);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::Configuration("retry policy allows zero attempts".to_string())
        }))
    }
}
