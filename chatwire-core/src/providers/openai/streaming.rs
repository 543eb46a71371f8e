//! Streaming support for OpenAI-compatible responses
//!
//! Each stream runs as its own task. The task owns the backend stream handle
//! and is the only writer to the event channel, so events reach the consumer
//! in the order they were produced.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::converter::convert_usage;
use super::types::{OpenAIRequest, OpenAIStreamChunk, OpenAIToolCallDelta};
use crate::http::{ChatTransport, CompletionStream};
use crate::protocol::{FinishReason, ProviderEvent, ProviderResponse, TokenUsage, ToolCall};
use crate::providers::error::ProviderError;
use crate::providers::retry::RetryPolicy;
use crate::providers::EventStream;

/// Events buffered between the stream task and the consumer
const EVENT_BUFFER: usize = 64;

/// Incremental reconstruction of a streamed response
#[derive(Debug, Default)]
pub(crate) struct StreamAssembler {
    content: String,
    tool_calls: Vec<ToolCall>,
    usage: TokenUsage,
    finish_reason: FinishReason,
}

impl StreamAssembler {
    /// Fold one chunk into the running state and return the events it produces
    pub(crate) fn apply_chunk(&mut self, chunk: OpenAIStreamChunk) -> Vec<ProviderEvent> {
        // The terminal usage chunk carries no choices
        if let Some(usage) = chunk.usage.as_ref() {
            self.usage = convert_usage(Some(usage));
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        let delta = choice.delta;

        if let Some(thinking) = delta.reasoning_content.filter(|t| !t.is_empty()) {
            events.push(ProviderEvent::ThinkingDelta(thinking));
        }

        if let Some(text) = delta.content.filter(|t| !t.is_empty()) {
            self.content.push_str(&text);
            events.push(ProviderEvent::ContentDelta(text));
        }

        for call in delta.tool_calls.unwrap_or_default() {
            self.apply_tool_call(call, &mut events);
        }

        if let Some(reason) = choice.finish_reason.filter(|r| !r.is_empty()) {
            self.finish_reason = FinishReason::from_wire(&reason);
        }

        events
    }

    fn apply_tool_call(&mut self, delta: OpenAIToolCallDelta, events: &mut Vec<ProviderEvent>) {
        let position = |len: usize| usize::try_from(delta.index).ok().filter(|i| *i < len);

        if position(self.tool_calls.len()).is_none() {
            match delta.id.as_deref() {
                Some(id) => {
                    let stub = ToolCall {
                        id: id.to_string(),
                        ..ToolCall::default()
                    };
                    self.tool_calls.push(stub.clone());
                    events.push(ProviderEvent::ToolUseStart(stub));
                }
                None => {
                    debug!(index = delta.index, "Ignoring tool call delta without a known call");
                    return;
                }
            }
        }

        // A stub appended at the tail only resolves if the index points at it
        let Some(index) = position(self.tool_calls.len()) else {
            return;
        };
        let Some(function) = delta.function else {
            return;
        };

        let call = &mut self.tool_calls[index];
        if let Some(name) = function.name {
            call.name.push_str(&name);
        }
        if let Some(arguments) = function.arguments.filter(|a| !a.is_empty()) {
            call.input.push_str(&arguments);
            events.push(ProviderEvent::ToolUseDelta(ToolCall {
                id: call.id.clone(),
                name: call.name.clone(),
                input: arguments,
                finished: false,
            }));
        }
    }

    /// Close out the stream after a clean end
    pub(crate) fn finish(self) -> Vec<ProviderEvent> {
        let mut tool_calls = self.tool_calls;
        for call in &mut tool_calls {
            call.finished = true;
        }

        let mut events: Vec<ProviderEvent> = tool_calls
            .iter()
            .cloned()
            .map(ProviderEvent::ToolUseStop)
            .collect();
        events.push(ProviderEvent::ContentStop);
        events.push(ProviderEvent::Complete(ProviderResponse {
            content: self.content,
            tool_calls,
            usage: self.usage,
            finish_reason: self.finish_reason,
        }));
        events
    }
}

/// Launch the task that opens `request` and translates its chunks
pub(crate) fn spawn_stream(
    transport: Arc<dyn ChatTransport>,
    retry: RetryPolicy,
    request: OpenAIRequest,
    warnings: Vec<String>,
    cancel: CancellationToken,
) -> EventStream {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    tokio::spawn(run_stream(transport, retry, request, warnings, cancel, tx));
    EventStream::new(rx)
}

async fn run_stream(
    transport: Arc<dyn ChatTransport>,
    retry: RetryPolicy,
    request: OpenAIRequest,
    warnings: Vec<String>,
    cancel: CancellationToken,
    events: mpsc::Sender<ProviderEvent>,
) {
    let opened = {
        let transport = &transport;
        let request = &request;
        retry
            .execute(&cancel, "stream request", move || {
                transport.create_completion_stream(request)
            })
            .await
    };

    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            warn!(model = %request.model, error = %e, "Failed to open stream");
            let _ = events.send(ProviderEvent::Error(e)).await;
            return;
        }
    };

    pump(stream.as_mut(), &events, &cancel, warnings).await;
    stream.close().await;
}

/// Consume chunks until a clean end, an error, cancellation, or the consumer
/// going away
async fn pump(
    stream: &mut dyn CompletionStream,
    events: &mpsc::Sender<ProviderEvent>,
    cancel: &CancellationToken,
    warnings: Vec<String>,
) {
    let opening = std::iter::once(ProviderEvent::ContentStart)
        .chain(warnings.into_iter().map(ProviderEvent::Warning));
    for event in opening {
        if !emit(events, cancel, event).await {
            return;
        }
    }

    let mut assembler = StreamAssembler::default();
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                notify_cancelled(events);
                return;
            }
            _ = events.closed() => {
                debug!("Event consumer dropped, stopping stream");
                return;
            }
            next = stream.recv() => next,
        };

        match next {
            Ok(Some(chunk)) => {
                for event in assembler.apply_chunk(chunk) {
                    if !emit(events, cancel, event).await {
                        return;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Stream terminated by transport error");
                emit(events, cancel, ProviderEvent::Error(e)).await;
                return;
            }
        }
    }

    for event in assembler.finish() {
        if !emit(events, cancel, event).await {
            return;
        }
    }
}

/// Deliver one event, giving up if the caller cancels while the buffer is full.
/// Returns false once the stream should stop.
async fn emit(
    events: &mpsc::Sender<ProviderEvent>,
    cancel: &CancellationToken,
    event: ProviderEvent,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            notify_cancelled(events);
            false
        }
        sent = events.send(event) => {
            if sent.is_err() {
                debug!("Event consumer dropped, stopping stream");
            }
            sent.is_ok()
        }
    }
}

/// Best effort; dropped when the buffer is full
fn notify_cancelled(events: &mpsc::Sender<ProviderEvent>) {
    info!("Stream cancelled by caller");
    let _ = events.try_send(ProviderEvent::Error(ProviderError::Cancelled));
}
