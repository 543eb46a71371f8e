//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chatwire_core::http::{ChatTransport, CompletionStream};
use chatwire_core::models::GPT_4O;
use chatwire_core::providers::openai::types::{OpenAIRequest, OpenAIResponse, OpenAIStreamChunk};
use chatwire_core::{
    get_model, new_provider, EventStream, ModelProvider, Provider, ProviderClientOptions,
    ProviderError, ProviderEvent, ProviderResult,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Route crate logs to the test writer; honors RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a chunk from its wire JSON
pub fn chunk(value: Value) -> OpenAIStreamChunk {
    serde_json::from_value(value).expect("valid chunk json")
}

/// Parse a response from its wire JSON
pub fn response(value: Value) -> OpenAIResponse {
    serde_json::from_value(value).expect("valid response json")
}

/// One step of a scripted stream
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(OpenAIStreamChunk),
    Fail(ProviderError),
    /// Never yields, like a backend that stopped sending
    Hang,
}

/// Transport that replays canned results in order
#[derive(Default)]
pub struct ScriptedTransport {
    completions: Mutex<VecDeque<ProviderResult<OpenAIResponse>>>,
    streams: Mutex<VecDeque<ProviderResult<Vec<Step>>>>,
    requests: Mutex<Vec<OpenAIRequest>>,
    closed: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_completion(&self, result: ProviderResult<OpenAIResponse>) {
        self.completions.lock().unwrap().push_back(result);
    }

    pub fn push_stream(&self, result: ProviderResult<Vec<Step>>) {
        self.streams.lock().unwrap().push_back(result);
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<OpenAIRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of streams that were closed
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn create_completion(&self, request: &OpenAIRequest) -> ProviderResult<OpenAIResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".into())))
    }

    async fn create_completion_stream(
        &self,
        request: &OpenAIRequest,
    ) -> ProviderResult<Box<dyn CompletionStream>> {
        self.requests.lock().unwrap().push(request.clone());
        let steps = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".into())))?;
        Ok(Box::new(ScriptedStream {
            steps: steps.into(),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct ScriptedStream {
    steps: VecDeque<Step>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl CompletionStream for ScriptedStream {
    async fn recv(&mut self) -> ProviderResult<Option<OpenAIStreamChunk>> {
        match self.steps.pop_front() {
            None => Ok(None),
            Some(Step::Chunk(chunk)) => Ok(Some(chunk)),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => futures::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// An OpenAI provider backed by `transport`
pub fn scripted_provider(transport: &Arc<ScriptedTransport>) -> Box<dyn Provider> {
    let model = get_model(GPT_4O).expect("registered model").clone();
    let options = ProviderClientOptions::new()
        .with_model(model)
        .with_system_message("You are terse.")
        .with_transport(transport.clone());
    new_provider(ModelProvider::OpenAI, options).expect("provider")
}

/// Drain a stream into a vector
pub async fn collect(mut stream: EventStream) -> Vec<ProviderEvent> {
    let mut events = Vec::new();
    while let Some(event) = stream.recv().await {
        events.push(event);
    }
    events
}
