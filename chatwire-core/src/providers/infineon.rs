//! Infineon backend
//!
//! Infineon exposes an OpenAI-compatible endpoint, so this is a thin
//! configuration layer over [`OpenAIClient`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::ProviderClientOptions;
use crate::models::ModelProvider;
use crate::protocol::{Message, ProviderResponse};
use crate::providers::error::ProviderResult;
use crate::providers::openai::OpenAIClient;
use crate::providers::retry::RetryPolicy;
use crate::providers::{EventStream, ProviderClient};
use crate::tools::BaseTool;

/// Default Infineon API endpoint
pub const INFINEON_BASE_URL: &str = "https://api.infineon.ai/v1";

/// Client for the Infineon chat API
pub struct InfineonClient {
    inner: OpenAIClient,
}

impl InfineonClient {
    pub fn new(options: ProviderClientOptions) -> ProviderResult<Self> {
        let backend = options.infineon_options.clone();
        // Streamed usage is opt-in for this backend
        let inner = OpenAIClient::for_backend(
            options,
            &backend,
            INFINEON_BASE_URL,
            ModelProvider::Infineon,
            false,
        )?;
        Ok(Self { inner })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        Self {
            inner: self.inner.with_retry_policy(retry),
        }
    }
}

#[async_trait]
impl ProviderClient for InfineonClient {
    async fn send(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> ProviderResult<ProviderResponse> {
        self.inner.send(cancel, messages, tools).await
    }

    fn stream(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> EventStream {
        self.inner.stream(cancel, messages, tools)
    }
}
