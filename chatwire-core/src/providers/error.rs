//! Provider error types and handling

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when interacting with LLM backends
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Delay requested by the backend, if any
        retry_after: Option<Duration>,
    },

    /// Server errors persisted through every allowed attempt
    #[error("max retries reached: {0}")]
    MaxRetries(Box<ProviderError>),

    /// The backend answered successfully but with an unusable shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection or stream I/O failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller cancelled the operation
    #[error("Request cancelled")]
    Cancelled,

    /// No backend matches the requested identifier
    #[error("provider not supported: {0}")]
    UnsupportedProvider(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request or response (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProviderError {
    /// Build an API error without a retry hint
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ProviderError::Api {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Wrap an error whose retry budget ran out
    pub fn max_retries(source: ProviderError) -> Self {
        ProviderError::MaxRetries(Box::new(source))
    }

    /// HTTP status when this is a backend API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Transport(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ProviderError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::api(status.as_u16(), err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization(err.to_string())
    }
}

impl From<ConfigError> for ProviderError {
    fn from(err: ConfigError) -> Self {
        ProviderError::Configuration(err.to_string())
    }
}
