//! Core conversation types
//!
//! These are the provider-agnostic structures callers build their message
//! history from. The design prioritizes:
//! - Type safety through enums and strong typing
//! - A single ordered list of parts per message, so text, attachments and
//!   tool traffic keep their relative order
//! - Cheap read-only access for the conversion layer

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::models::ModelProvider;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input message
    User,
    /// Assistant (model) response
    Assistant,
    /// Tool results fed back to the model
    Tool,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    #[default]
    Unknown,
}

impl FinishReason {
    /// Map a backend finish-reason string. Unrecognized values map to `Unknown`.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" => FinishReason::ToolCalls,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Unknown,
        }
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier assigned by the backend, unique per request
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Serialized arguments (usually a JSON object)
    pub input: String,

    /// Whether the call has been fully received
    #[serde(default)]
    pub finished: bool,
}

impl ToolCall {
    /// Create a finished tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input: input.into(),
            finished: true,
        }
    }
}

/// Result of running a tool, sent back in a Tool-role message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Back-reference to the originating [`ToolCall::id`]
    pub tool_call_id: String,

    /// Tool name, informational only
    #[serde(default)]
    pub name: String,

    /// Result payload
    pub content: String,

    /// Whether the tool reported a failure
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn new(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            name: String::new(),
            content: content.into(),
            is_error: false,
        }
    }
}

/// An attachment carried inline with a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryContent {
    /// Where the attachment came from (file name or path)
    pub path: String,

    /// MIME type, e.g. `image/png`
    pub mime_type: String,

    /// Raw bytes
    pub data: Vec<u8>,
}

impl BinaryContent {
    pub fn new(path: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Render the attachment the way the given backend expects to reference it.
    ///
    /// OpenAI-compatible backends take inline `data:` URLs.
    pub fn to_provider_url(&self, provider: ModelProvider) -> String {
        let encoded = STANDARD.encode(&self.data);
        match provider {
            ModelProvider::OpenAI | ModelProvider::Infineon => {
                format!("data:{};base64,{}", self.mime_type, encoded)
            }
        }
    }
}

/// Individual content part of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content part
    Text { text: String },
    /// Model reasoning, kept for display only
    Reasoning { thinking: String },
    /// Inline attachment
    Binary(BinaryContent),
    /// Tool call made by the assistant
    ToolCall(ToolCall),
    /// Result of a tool call
    ToolResult(ToolResult),
    /// Terminal marker recording why the assistant stopped
    Finish { reason: FinishReason },
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Ordered content parts
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

impl Message {
    /// Create a message from explicit parts
    pub fn new(role: MessageRole, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![ContentPart::Text { text: text.into() }])
    }

    /// Create an assistant message with a single text part
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(
            MessageRole::Assistant,
            vec![ContentPart::Text { text: text.into() }],
        )
    }

    /// Create a tool message carrying the given results
    pub fn tool(results: Vec<ToolResult>) -> Self {
        Self::new(
            MessageRole::Tool,
            results.into_iter().map(ContentPart::ToolResult).collect(),
        )
    }

    /// Append a part
    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Append an attachment
    pub fn with_binary(self, binary: BinaryContent) -> Self {
        self.with_part(ContentPart::Binary(binary))
    }

    /// Append a tool call
    pub fn with_tool_call(self, call: ToolCall) -> Self {
        self.with_part(ContentPart::ToolCall(call))
    }

    /// True when the message carries no parts at all
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Concatenated text of all text parts, in order
    pub fn content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Attachments in order
    pub fn binary_content(&self) -> Vec<&BinaryContent> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Binary(binary) => Some(binary),
                _ => None,
            })
            .collect()
    }

    /// Tool calls in order
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Tool results in order
    pub fn tool_results(&self) -> Vec<&ToolResult> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolResult(result) => Some(result),
                _ => None,
            })
            .collect()
    }
}

/// Drop messages that carry no parts, preserving the order of the rest
pub fn clean_messages(messages: &[Message]) -> Vec<Message> {
    messages.iter().filter(|m| !m.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_joins_text_parts() {
        let msg = Message::user("Hello, ")
            .with_part(ContentPart::Reasoning {
                thinking: "ignored".to_string(),
            })
            .with_part(ContentPart::Text {
                text: "world".to_string(),
            });
        assert_eq!(msg.content(), "Hello, world");
    }

    #[test]
    fn test_accessors_filter_by_kind() {
        let msg = Message::new(MessageRole::Assistant, vec![])
            .with_tool_call(ToolCall::new("call_1", "lookup", "{}"))
            .with_part(ContentPart::Finish {
                reason: FinishReason::ToolCalls,
            });
        assert_eq!(msg.tool_calls().len(), 1);
        assert!(msg.tool_results().is_empty());
        assert!(msg.binary_content().is_empty());
    }

    #[test]
    fn test_binary_data_url() {
        let binary = BinaryContent::new("dot.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(
            binary.to_provider_url(ModelProvider::Infineon),
            "data:image/png;base64,iVBORw=="
        );
    }

    #[test]
    fn test_clean_messages_drops_empty() {
        let messages = vec![
            Message::user("first"),
            Message::new(MessageRole::Assistant, vec![]),
            Message::user("second"),
        ];
        let cleaned = clean_messages(&messages);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].content(), "first");
        assert_eq!(cleaned[1].content(), "second");
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_wire("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::from_wire("tool_calls"), FinishReason::ToolCalls);
        assert_eq!(FinishReason::from_wire("whatever"), FinishReason::Unknown);
        assert_eq!(FinishReason::from_wire(""), FinishReason::Unknown);
    }
}
