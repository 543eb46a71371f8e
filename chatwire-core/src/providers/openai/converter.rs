//! Conversion between chatwire's protocol and the OpenAI format
//!
//! Conversion never fails as a whole. A tool call whose arguments cannot be
//! parsed, or a tool whose schema cannot be produced, is dropped on its own
//! and a diagnostic is pushed onto the caller's warning list.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use super::types::*;
use crate::models::ModelProvider;
use crate::protocol::{FinishReason, Message, MessageRole, ProviderResponse, TokenUsage, ToolCall};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::tools::BaseTool;

/// Convert a conversation to OpenAI messages, prepending the system prompt.
///
/// Messages without parts are skipped.
pub fn convert_messages(
    system_message: &str,
    messages: &[Message],
    provider: ModelProvider,
    warnings: &mut Vec<String>,
) -> Vec<OpenAIMessage> {
    let mut openai_messages = Vec::with_capacity(messages.len() + 1);
    openai_messages.push(OpenAIMessage::system(system_message));

    for message in messages.iter().filter(|m| !m.is_empty()) {
        match message.role {
            MessageRole::User => openai_messages.push(to_user_message(message, provider)),
            MessageRole::Assistant => {
                openai_messages.push(to_assistant_message(message, warnings))
            }
            MessageRole::Tool => {
                openai_messages.extend(message.tool_results().into_iter().map(|result| {
                    OpenAIMessage {
                        role: "tool".to_string(),
                        content: Some(OpenAIContent::Text(result.content.clone())),
                        tool_call_id: Some(result.tool_call_id.clone()),
                        ..Default::default()
                    }
                }))
            }
        }
    }

    openai_messages
}

fn to_user_message(message: &Message, provider: ModelProvider) -> OpenAIMessage {
    let mut parts = vec![OpenAIContentPart::Text {
        text: message.content(),
    }];
    parts.extend(
        message
            .binary_content()
            .into_iter()
            .map(|binary| OpenAIContentPart::ImageUrl {
                image_url: OpenAIImageUrl {
                    url: binary.to_provider_url(provider),
                    detail: None,
                },
            }),
    );

    OpenAIMessage {
        role: "user".to_string(),
        content: Some(OpenAIContent::Parts(parts)),
        ..Default::default()
    }
}

fn to_assistant_message(message: &Message, warnings: &mut Vec<String>) -> OpenAIMessage {
    let text = message.content();
    let content = (!text.is_empty()).then_some(OpenAIContent::Text(text));

    let calls = message.tool_calls();
    let tool_calls = if calls.is_empty() {
        None
    } else {
        Some(
            calls
                .into_iter()
                .filter_map(|call| to_openai_tool_call(call, warnings))
                .collect(),
        )
    };

    OpenAIMessage {
        role: "assistant".to_string(),
        content,
        tool_calls,
        ..Default::default()
    }
}

/// Re-serialize stored arguments as canonical JSON, or drop the call
fn to_openai_tool_call(call: &ToolCall, warnings: &mut Vec<String>) -> Option<OpenAIToolCall> {
    let arguments = match canonical_arguments(&call.input) {
        Ok(arguments) => arguments,
        Err(e) => {
            warn!(tool_call_id = %call.id, tool = %call.name, error = %e, "Dropping tool call with unparseable input");
            warnings.push(format!(
                "dropped tool call {} ({}): invalid arguments: {}",
                call.id, call.name, e
            ));
            return None;
        }
    };

    Some(OpenAIToolCall {
        id: call.id.clone(),
        tool_type: "function".to_string(),
        function: OpenAIFunctionCall {
            name: call.name.clone(),
            arguments,
        },
    })
}

/// Parse arguments as a JSON object and print them back compactly.
///
/// Blank input is a call without arguments and becomes `{}`.
pub fn canonical_arguments(input: &str) -> Result<String, serde_json::Error> {
    if input.trim().is_empty() {
        return Ok("{}".to_string());
    }
    let args: Map<String, Value> = serde_json::from_str(input)?;
    serde_json::to_string(&args)
}

/// Convert tool descriptors to OpenAI function declarations, skipping any
/// whose schema cannot be produced.
pub fn convert_tools(tools: &[Arc<dyn BaseTool>], warnings: &mut Vec<String>) -> Vec<OpenAITool> {
    tools
        .iter()
        .filter_map(|tool| match tool.json_schema() {
            Ok(schema) => Some(OpenAITool {
                tool_type: "function".to_string(),
                function: OpenAIFunction {
                    name: tool.name().to_string(),
                    description: Some(tool.description().to_string()),
                    parameters: Some(schema),
                },
            }),
            Err(e) => {
                warn!(tool = %tool.name(), error = %e, "Skipping tool with unusable schema");
                warnings.push(format!("skipped tool {}: {}", tool.name(), e));
                None
            }
        })
        .collect()
}

/// Convert OpenAI usage counters
pub fn convert_usage(usage: Option<&OpenAIUsage>) -> TokenUsage {
    let Some(usage) = usage else {
        return TokenUsage::default();
    };
    let cached = usage
        .prompt_tokens_details
        .as_ref()
        .map_or(0, |details| details.cached_tokens);

    TokenUsage {
        input_tokens: usage.prompt_tokens.saturating_sub(cached),
        output_tokens: usage.completion_tokens,
        cache_creation_tokens: 0,
        cache_read_tokens: cached,
    }
}

/// Convert a non-streaming response. Zero choices is a protocol error.
pub fn from_openai_response(response: OpenAIResponse) -> ProviderResult<ProviderResponse> {
    let usage = convert_usage(response.usage.as_ref());
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(ProviderError::Protocol("no choices returned".to_string()));
    };

    let content = choice.message.text().unwrap_or_default();
    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
        .collect();

    Ok(ProviderResponse {
        content,
        tool_calls,
        usage,
        finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref().unwrap_or_default()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{BinaryContent, ContentPart, ToolResult};
    use crate::tools::ToolSpec;
    use serde_json::json;

    #[test]
    fn test_system_message_always_first() {
        let mut warnings = Vec::new();
        let converted = convert_messages("", &[], ModelProvider::OpenAI, &mut warnings);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[0].content, Some(OpenAIContent::Text(String::new())));
    }

    #[test]
    fn test_user_message_with_attachment() {
        let message = Message::user("what is this?")
            .with_binary(BinaryContent::new("a.png", "image/png", vec![1, 2, 3]));
        let mut warnings = Vec::new();
        let converted = convert_messages("sys", &[message], ModelProvider::Infineon, &mut warnings);

        let Some(OpenAIContent::Parts(parts)) = &converted[1].content else {
            panic!("expected parts content");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], OpenAIContentPart::Text { text } if text == "what is this?"));
        assert!(
            matches!(&parts[1], OpenAIContentPart::ImageUrl { image_url } if image_url.url == "data:image/png;base64,AQID")
        );
    }

    #[test]
    fn test_assistant_tool_calls_are_canonicalized() {
        let message = Message::new(MessageRole::Assistant, vec![]).with_tool_call(ToolCall::new(
            "call_1",
            "lookup",
            "{ \"q\" :  1 }",
        ));
        let mut warnings = Vec::new();
        let converted = convert_messages("", &[message], ModelProvider::OpenAI, &mut warnings);

        let assistant = &converted[1];
        assert_eq!(assistant.role, "assistant");
        assert!(assistant.content.is_none());
        let calls = assistant.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, r#"{"q":1}"#);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bad_tool_call_dropped_alone() {
        let message = Message::assistant("checking")
            .with_tool_call(ToolCall::new("bad", "lookup", "{not json"))
            .with_tool_call(ToolCall::new("good", "lookup", r#"{"q":2}"#));
        let mut warnings = Vec::new();
        let converted = convert_messages("", &[message], ModelProvider::OpenAI, &mut warnings);

        let calls = converted[1].tool_calls.as_ref().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "good");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("bad"));
    }

    #[test]
    fn test_tool_message_expands_per_result() {
        let message = Message::tool(vec![
            ToolResult::new("call_1", "one"),
            ToolResult::new("call_2", "two"),
        ]);
        let mut warnings = Vec::new();
        let converted = convert_messages("", &[message], ModelProvider::OpenAI, &mut warnings);

        assert_eq!(converted.len(), 3);
        assert_eq!(converted[1].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(converted[2].tool_call_id.as_deref(), Some("call_2"));
        assert_eq!(converted[2].role, "tool");
    }

    #[test]
    fn test_empty_messages_filtered() {
        let messages = vec![
            Message::new(MessageRole::User, vec![]),
            Message::user("hi"),
            Message::new(MessageRole::Tool, vec![]),
        ];
        let mut warnings = Vec::new();
        let converted = convert_messages("", &messages, ModelProvider::OpenAI, &mut warnings);
        assert_eq!(converted.len(), 2);
    }

    #[test]
    fn test_finish_part_only_assistant_still_sent() {
        let message = Message::new(
            MessageRole::Assistant,
            vec![ContentPart::Finish {
                reason: FinishReason::Stop,
            }],
        );
        let mut warnings = Vec::new();
        let converted = convert_messages("", &[message], ModelProvider::OpenAI, &mut warnings);
        assert_eq!(converted.len(), 2);
        assert!(converted[1].tool_calls.is_none());
    }

    #[test]
    fn test_convert_tools_skips_broken_schema() {
        let tools: Vec<Arc<dyn BaseTool>> = vec![
            Arc::new(ToolSpec::new("ok", "fine", json!({"type": "object"}))),
            Arc::new(ToolSpec::new("broken", "bad", json!(42))),
        ];
        let mut warnings = Vec::new();
        let converted = convert_tools(&tools, &mut warnings);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].function.name, "ok");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_canonical_arguments_blank_input() {
        assert_eq!(canonical_arguments("").unwrap(), "{}");
        assert_eq!(canonical_arguments("  ").unwrap(), "{}");
        assert!(canonical_arguments("[1,2]").is_err());
    }

    #[test]
    fn test_convert_usage_with_cache() {
        let usage = OpenAIUsage {
            prompt_tokens: 100,
            completion_tokens: 20,
            total_tokens: 120,
            prompt_tokens_details: Some(OpenAIPromptTokensDetails { cached_tokens: 40 }),
        };
        let converted = convert_usage(Some(&usage));
        assert_eq!(converted.input_tokens, 60);
        assert_eq!(converted.cache_read_tokens, 40);
        assert_eq!(converted.output_tokens, 20);
        assert_eq!(convert_usage(None), TokenUsage::default());
    }

    #[test]
    fn test_zero_choices_is_protocol_error() {
        let err = from_openai_response(OpenAIResponse::default()).unwrap_err();
        assert!(matches!(err, ProviderError::Protocol(_)));
    }
}
