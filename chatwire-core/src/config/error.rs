//! Configuration error types

use thiserror::Error;

/// Errors raised while turning option values into a working client
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
