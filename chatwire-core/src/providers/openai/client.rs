//! OpenAI client implementation

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::converter::{convert_messages, convert_tools, from_openai_response};
use super::streaming::spawn_stream;
use super::types::{OpenAIMessage, OpenAIRequest, OpenAIStreamOptions, OpenAITool};
use crate::config::{BackendOptions, ProviderClientOptions};
use crate::http::{ChatTransport, HttpTransport};
use crate::models::{Model, ModelProvider};
use crate::protocol::{Message, ProviderResponse};
use crate::providers::error::ProviderResult;
use crate::providers::retry::RetryPolicy;
use crate::providers::{EventStream, ProviderClient};
use crate::tools::BaseTool;

/// Default OpenAI API endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI and OpenAI-compatible chat backends
pub struct OpenAIClient {
    options: ProviderClientOptions,
    transport: Arc<dyn ChatTransport>,
    retry: RetryPolicy,
    provider: ModelProvider,
    stream_usage: bool,
}

impl OpenAIClient {
    /// Create a client for the OpenAI API
    pub fn new(options: ProviderClientOptions) -> ProviderResult<Self> {
        let backend = options.openai_options.clone();
        Self::for_backend(options, &backend, OPENAI_BASE_URL, ModelProvider::OpenAI, true)
    }

    /// Create a client for any OpenAI-compatible backend
    pub(crate) fn for_backend(
        options: ProviderClientOptions,
        backend: &BackendOptions,
        default_base_url: &str,
        provider: ModelProvider,
        default_stream_usage: bool,
    ) -> ProviderResult<Self> {
        let transport: Arc<dyn ChatTransport> = match options.transport.clone() {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::from_options(
                default_base_url,
                options.api_key.clone(),
                backend,
            )?),
        };

        debug!(
            provider = %provider,
            model = %options.model.api_model,
            "Created chat client"
        );

        Ok(Self {
            stream_usage: backend.stream_usage.unwrap_or(default_stream_usage),
            options,
            transport,
            retry: RetryPolicy::default(),
            provider,
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &Model {
        &self.options.model
    }

    /// Build the wire request shared by both call paths
    fn prepared_params(&self, messages: Vec<OpenAIMessage>, tools: Vec<OpenAITool>) -> OpenAIRequest {
        OpenAIRequest {
            model: self.options.model.api_model.clone(),
            messages,
            max_tokens: (self.options.max_tokens > 0).then_some(self.options.max_tokens),
            stream: None,
            stream_options: None,
            tools: (!tools.is_empty()).then_some(tools),
        }
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
        warnings: &mut Vec<String>,
    ) -> OpenAIRequest {
        let messages = convert_messages(
            &self.options.system_message,
            messages,
            self.provider,
            warnings,
        );
        let tools = convert_tools(tools, warnings);
        self.prepared_params(messages, tools)
    }
}

#[async_trait]
impl ProviderClient for OpenAIClient {
    async fn send(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> ProviderResult<ProviderResponse> {
        let mut warnings = Vec::new();
        let request = self.build_request(messages, tools, &mut warnings);

        info!(
            provider = %self.provider,
            model = %request.model,
            messages = request.messages.len(),
            warnings = warnings.len(),
            "Sending chat completion"
        );

        let response = {
            let transport = &self.transport;
            let request = &request;
            self.retry
                .execute(cancel, "chat completion", move || {
                    transport.create_completion(request)
                })
                .await?
        };

        from_openai_response(response)
    }

    fn stream(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> EventStream {
        let mut warnings = Vec::new();
        let mut request = self.build_request(messages, tools, &mut warnings);
        request.stream = Some(true);
        if self.stream_usage {
            request.stream_options = Some(OpenAIStreamOptions {
                include_usage: Some(true),
            });
        }

        info!(
            provider = %self.provider,
            model = %request.model,
            messages = request.messages.len(),
            "Opening chat completion stream"
        );

        spawn_stream(
            Arc::clone(&self.transport),
            self.retry.clone(),
            request,
            warnings,
            cancel.clone(),
        )
    }
}
