//! Client options
//!
//! Options are plain values handed in by the caller. Nothing here reads the
//! environment or the filesystem; loading configuration is the caller's job.

mod error;
mod secrets;

pub use error::ConfigError;
pub use secrets::{redact_by_field_name, SecretString};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::ChatTransport;
use crate::models::Model;

/// Settings specific to one OpenAI-compatible backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOptions {
    /// Overrides the backend's default base URL
    pub base_url: Option<String>,

    /// Headers added to every request
    pub extra_headers: HashMap<String, String>,

    /// Ask intermediaries not to serve cached responses
    pub disable_cache: bool,

    /// Request a terminal usage chunk on streams; `None` keeps the backend default
    pub stream_usage: Option<bool>,
}

/// Sub-options for the OpenAI backend
pub type OpenAIOptions = BackendOptions;

/// Sub-options for the Infineon backend
pub type InfineonOptions = BackendOptions;

impl BackendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the extra headers
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = headers;
        self
    }

    /// Add a single extra header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Disable response caching
    pub fn with_disable_cache(mut self) -> Self {
        self.disable_cache = true;
        self
    }

    /// Toggle terminal usage chunks on streams
    pub fn with_stream_usage(mut self, enabled: bool) -> Self {
        self.stream_usage = Some(enabled);
        self
    }
}

/// Everything a provider needs to build its client
#[derive(Clone, Default)]
pub struct ProviderClientOptions {
    pub api_key: SecretString,
    pub model: Model,
    /// Output token cap; zero leaves it to the backend
    pub max_tokens: u64,
    pub system_message: String,
    pub openai_options: OpenAIOptions,
    pub infineon_options: InfineonOptions,
    /// Replaces the default HTTP transport
    pub transport: Option<Arc<dyn ChatTransport>>,
}

impl ProviderClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model descriptor
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set max output tokens
    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the system prompt
    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    /// Set OpenAI sub-options
    pub fn with_openai_options(mut self, options: OpenAIOptions) -> Self {
        self.openai_options = options;
        self
    }

    /// Set Infineon sub-options
    pub fn with_infineon_options(mut self, options: InfineonOptions) -> Self {
        self.infineon_options = options;
        self
    }

    /// Use a custom transport instead of the built-in HTTP one
    pub fn with_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }
}

impl fmt::Debug for ProviderClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClientOptions")
            .field("api_key", &self.api_key)
            .field("model", &self.model.id)
            .field("max_tokens", &self.max_tokens)
            .field("system_message_len", &self.system_message.len())
            .field("openai_options", &self.openai_options)
            .field("infineon_options", &self.infineon_options)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
