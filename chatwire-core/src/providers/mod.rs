//! Provider implementations and the uniform provider surface
//!
//! Callers only ever see [`Provider`]. Each backend implements
//! [`ProviderClient`] and is wrapped in a [`BaseProvider`], which cleans the
//! conversation before handing it to the backend.

pub mod error;
pub mod infineon;
pub mod openai;
pub mod retry;

pub use error::{ProviderError, ProviderResult};
pub use infineon::InfineonClient;
pub use openai::OpenAIClient;
pub use retry::{RetryDecision, RetryPolicy, MAX_RETRIES};

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ProviderClientOptions;
use crate::models::{Model, ModelProvider};
use crate::protocol::{clean_messages, Message, ProviderEvent, ProviderResponse};
use crate::tools::BaseTool;

/// Ordered events of one streamed response
///
/// The sequence ends when the producing task finishes; it is not restartable.
pub struct EventStream {
    receiver: mpsc::Receiver<ProviderEvent>,
}

impl EventStream {
    pub(crate) fn new(receiver: mpsc::Receiver<ProviderEvent>) -> Self {
        Self { receiver }
    }

    /// Next event, or `None` once the stream is finished
    pub async fn recv(&mut self) -> Option<ProviderEvent> {
        self.receiver.recv().await
    }
}

impl Stream for EventStream {
    type Item = ProviderEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// A backend client speaking chatwire's protocol
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Issue one non-streaming call, retrying transient failures
    async fn send(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> ProviderResult<ProviderResponse>;

    /// Start a streamed call on a background task. Requires a Tokio runtime.
    fn stream(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> EventStream;
}

/// The provider capability exposed to callers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a conversation and wait for the aggregated response
    async fn send_messages(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> ProviderResult<ProviderResponse>;

    /// Send a conversation and receive the response as events
    fn stream_response(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> EventStream;

    /// Model this provider was built for
    fn model(&self) -> &Model;
}

/// Wraps a backend client with conversation cleanup
pub struct BaseProvider<C> {
    model: Model,
    client: C,
}

impl<C: ProviderClient> BaseProvider<C> {
    pub fn new(model: Model, client: C) -> Self {
        Self { model, client }
    }
}

#[async_trait]
impl<C: ProviderClient> Provider for BaseProvider<C> {
    async fn send_messages(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> ProviderResult<ProviderResponse> {
        let messages = clean_messages(messages);
        self.client.send(cancel, &messages, tools).await
    }

    fn stream_response(
        &self,
        cancel: &CancellationToken,
        messages: &[Message],
        tools: &[Arc<dyn BaseTool>],
    ) -> EventStream {
        let messages = clean_messages(messages);
        self.client.stream(cancel, &messages, tools)
    }

    fn model(&self) -> &Model {
        &self.model
    }
}

/// Build the provider for `provider` from `options`
pub fn new_provider(
    provider: ModelProvider,
    options: ProviderClientOptions,
) -> ProviderResult<Box<dyn Provider>> {
    debug!(provider = %provider, model = %options.model.id, "Creating provider");
    let model = options.model.clone();

    match provider {
        ModelProvider::OpenAI => Ok(Box::new(BaseProvider::new(
            model,
            OpenAIClient::new(options)?,
        ))),
        ModelProvider::Infineon => Ok(Box::new(BaseProvider::new(
            model,
            InfineonClient::new(options)?,
        ))),
    }
}

/// Build a provider from its string identifier
///
/// Unknown identifiers fail with [`ProviderError::UnsupportedProvider`].
pub fn new_provider_by_id(
    provider_id: &str,
    options: ProviderClientOptions,
) -> ProviderResult<Box<dyn Provider>> {
    new_provider(provider_id.parse()?, options)
}
