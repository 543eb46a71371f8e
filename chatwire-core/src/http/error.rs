//! HTTP error mapping utilities

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;
use uuid::Uuid;

use crate::providers::error::ProviderError;
use crate::providers::openai::types::OpenAIError;

/// Map a non-success HTTP response to a [`ProviderError::Api`]
pub fn map_http_error(
    status: StatusCode,
    headers: &HeaderMap,
    body: Option<String>,
    request_id: Uuid,
) -> ProviderError {
    let message = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<OpenAIError>(b).ok())
        .map(|e| e.error.message)
        .or_else(|| body.filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after);

    ProviderError::Api {
        status: status.as_u16(),
        message: format!("{} [request_id: {}]", message, request_id),
        retry_after,
    }
}

/// Parse a Retry-After header value given in (possibly fractional) seconds
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let value = header_value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // HTTP dates are not supported; callers fall back to backoff
    value
        .parse::<f64>()
        .ok()
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
}
