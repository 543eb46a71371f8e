//! Chatwire Core Library
//!
//! A provider-agnostic chat-completion client. Callers hand in a normalized
//! conversation and tool list and get back either one aggregated
//! [`ProviderResponse`] or an ordered stream of [`ProviderEvent`]s,
//! regardless of which backend served the request.

pub mod config;
pub mod http;
pub mod models;
pub mod protocol;
pub mod providers;
pub mod tools;

pub use config::{BackendOptions, ProviderClientOptions, SecretString};
pub use models::{get_model, Model, ModelId, ModelProvider};
pub use protocol::{FinishReason, Message, ProviderEvent, ProviderResponse, TokenUsage, ToolCall};
pub use providers::{
    new_provider, new_provider_by_id, EventStream, Provider, ProviderError, ProviderResult,
};
pub use tools::{BaseTool, ToolSpec};

/// Returns the version of the Chatwire Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
