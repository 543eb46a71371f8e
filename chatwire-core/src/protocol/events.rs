//! Backend-independent results and stream events

use serde::{Deserialize, Serialize};

use super::types::{FinishReason, ToolCall};
use crate::providers::error::ProviderError;

/// Token accounting for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_creation_tokens: u64,
    pub cache_read_tokens: u64,
}

/// Aggregated result of a completed call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Final text content, empty when the model produced none
    pub content: String,

    /// Completed tool calls in the order the model issued them
    pub tool_calls: Vec<ToolCall>,

    pub usage: TokenUsage,

    pub finish_reason: FinishReason,
}

/// One step of a streamed response
///
/// A successfully opened stream starts with exactly one `ContentStart` and
/// ends with exactly one of `Complete` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    ContentStart,
    /// Incremental text, not the accumulated value
    ContentDelta(String),
    /// Incremental reasoning text
    ThinkingDelta(String),
    /// A new tool call stub: id set, name possibly empty
    ToolUseStart(ToolCall),
    /// An arguments fragment; `input` holds only the fragment
    ToolUseDelta(ToolCall),
    /// A fully assembled tool call
    ToolUseStop(ToolCall),
    ContentStop,
    Complete(ProviderResponse),
    Error(ProviderError),
    Warning(String),
}
