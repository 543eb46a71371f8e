//! Backend transport layer
//!
//! The provider core only talks to backends through [`ChatTransport`]. This
//! module defines that capability and ships a reqwest-based implementation:
//! - Bearer auth, extra headers and request-ID correlation
//! - Error mapping with retry-after hints
//! - Server-sent-event decoding for streaming completions

pub mod client;
pub mod error;
mod sse;

pub use client::HttpTransport;

use async_trait::async_trait;

use crate::providers::error::ProviderResult;
use crate::providers::openai::types::{OpenAIRequest, OpenAIResponse, OpenAIStreamChunk};

/// A connection to an OpenAI-compatible chat backend
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Issue a non-streaming completion
    async fn create_completion(&self, request: &OpenAIRequest) -> ProviderResult<OpenAIResponse>;

    /// Open a streaming completion
    async fn create_completion_stream(
        &self,
        request: &OpenAIRequest,
    ) -> ProviderResult<Box<dyn CompletionStream>>;
}

/// An open streaming completion
#[async_trait]
pub trait CompletionStream: Send {
    /// Next chunk, or `Ok(None)` once the backend signalled a clean end
    async fn recv(&mut self) -> ProviderResult<Option<OpenAIStreamChunk>>;

    /// Release the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}
