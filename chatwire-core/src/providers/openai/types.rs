//! OpenAI chat-completions wire types
//!
//! These types match the OpenAI API format and are shared by every
//! OpenAI-compatible backend. Response-side types are lenient: fields the
//! core does not depend on default when a compatible server omits them.

use serde::{Deserialize, Serialize};

/// OpenAI chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<OpenAIStreamOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAITool>>,
}

/// OpenAI message format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIMessage {
    #[serde(default)]
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<OpenAIContent>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
}

impl OpenAIMessage {
    /// A system message with plain text
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(OpenAIContent::Text(text.into())),
            ..Default::default()
        }
    }

    /// Text of the content, whichever shape it came in
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Some(OpenAIContent::Text(text)) => Some(text.clone()),
            Some(OpenAIContent::Parts(parts)) => Some(
                parts
                    .iter()
                    .filter_map(|part| match part {
                        OpenAIContentPart::Text { text } => Some(text.as_str()),
                        OpenAIContentPart::ImageUrl { .. } => None,
                    })
                    .collect(),
            ),
            None => None,
        }
    }
}

/// OpenAI content (can be string or array of parts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAIContent {
    Text(String),
    Parts(Vec<OpenAIContentPart>),
}

/// OpenAI content part for multimodal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpenAIContentPart {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "image_url")]
    ImageUrl { image_url: OpenAIImageUrl },
}

/// OpenAI image URL format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIImageUrl {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detail: Option<String>,
}

/// OpenAI function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// OpenAI tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,

    #[serde(rename = "type", default = "function_type")]
    pub tool_type: String,

    pub function: OpenAIFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

/// OpenAI tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: OpenAIFunction,
}

/// OpenAI function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIFunction {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parameters: Option<serde_json::Value>,
}

/// OpenAI stream options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIStreamOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_usage: Option<bool>,
}

/// OpenAI chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIChoice {
    #[serde(default)]
    pub index: u32,

    #[serde(default)]
    pub message: OpenAIMessage,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_reason: Option<String>,
}

/// OpenAI usage information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub completion_tokens: u64,

    #[serde(default)]
    pub total_tokens: u64,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prompt_tokens_details: Option<OpenAIPromptTokensDetails>,
}

/// Breakdown of prompt tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIPromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
}

/// OpenAI streaming chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIStreamChunk {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub choices: Vec<OpenAIStreamChoice>,

    /// Only present on the terminal chunk when usage was requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub usage: Option<OpenAIUsage>,
}

/// OpenAI streaming choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIStreamChoice {
    #[serde(default)]
    pub index: u32,

    #[serde(default)]
    pub delta: OpenAIDelta,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub finish_reason: Option<String>,
}

/// OpenAI delta for streaming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIDelta {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,

    /// Reasoning text streamed by some compatible servers
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reasoning_content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<OpenAIToolCallDelta>>,
}

/// OpenAI function call delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIFunctionCallDelta {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arguments: Option<String>,
}

/// OpenAI tool call delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OpenAIToolCallDelta {
    /// Position in the tool-call list; signed because some servers send -1
    pub index: i64,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[serde(rename = "type")]
    pub tool_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub function: Option<OpenAIFunctionCallDelta>,
}

/// OpenAI error response
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIError {
    pub error: OpenAIErrorDetail,
}

/// OpenAI error detail
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub error_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<serde_json::Value>,
}
