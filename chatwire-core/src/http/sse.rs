//! Server-sent-event decoding for streaming completions

use std::pin::Pin;

use async_trait::async_trait;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use tracing::{debug, warn};
use uuid::Uuid;

use super::CompletionStream;
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::openai::types::{OpenAIError, OpenAIStreamChunk};

type SseEvents =
    Pin<Box<dyn Stream<Item = Result<Event, EventStreamError<reqwest::Error>>> + Send>>;

/// Chunk stream over an SSE response body
///
/// `[DONE]` and the end of the body are both a clean end of stream.
pub(crate) struct SseCompletionStream {
    events: Option<SseEvents>,
    request_id: Uuid,
}

impl SseCompletionStream {
    pub(crate) fn new(response: reqwest::Response, request_id: Uuid) -> Self {
        Self {
            events: Some(Box::pin(response.bytes_stream().eventsource())),
            request_id,
        }
    }
}

#[async_trait]
impl CompletionStream for SseCompletionStream {
    async fn recv(&mut self) -> ProviderResult<Option<OpenAIStreamChunk>> {
        loop {
            let Some(events) = self.events.as_mut() else {
                return Ok(None);
            };

            let event = match events.next().await {
                None => {
                    self.events = None;
                    return Ok(None);
                }
                Some(Err(e)) => {
                    return Err(ProviderError::Transport(format!(
                        "Stream error: {} [request_id: {}]",
                        e, self.request_id
                    )))
                }
                Some(Ok(event)) => event,
            };

            let data = event.data.trim();
            if data.is_empty() {
                continue;
            }
            if data == "[DONE]" {
                self.events = None;
                return Ok(None);
            }

            // Chunk fields are all optional, so error payloads must be tried first
            if let Ok(error) = serde_json::from_str::<OpenAIError>(data) {
                return Err(ProviderError::Transport(format!(
                    "Backend reported error mid-stream: {} [request_id: {}]",
                    error.error.message, self.request_id
                )));
            }

            match serde_json::from_str::<OpenAIStreamChunk>(data) {
                Ok(chunk) => return Ok(Some(chunk)),
                Err(e) => {
                    warn!(
                        request_id = %self.request_id,
                        error = %e,
                        "Failed to parse stream chunk"
                    );
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.events.take().is_some() {
            debug!(request_id = %self.request_id, "Closed completion stream");
        }
    }
}
