//! Tests for non-streaming calls and the provider factory

mod common;

use std::time::Duration;

use chatwire_core::models::{get_model, INFINEON_GPT4O};
use chatwire_core::protocol::{FinishReason, Message, ToolCall};
use chatwire_core::{
    new_provider_by_id, ModelProvider, ProviderClientOptions, ProviderError,
};
use common::{init_tracing, response, scripted_provider, ScriptedTransport};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn ok_response() -> chatwire_core::providers::openai::OpenAIResponse {
    response(json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hi there"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    }))
}

#[tokio::test]
async fn test_send_maps_response() {
    init_tracing();
    let transport = ScriptedTransport::new();
    transport.push_completion(Ok(ok_response()));
    let provider = scripted_provider(&transport);

    let result = provider
        .send_messages(&CancellationToken::new(), &[Message::user("hello")], &[])
        .await;
    let response = tokio_test::assert_ok!(result);

    assert_eq!(response.content, "Hi there");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert!(response.tool_calls.is_empty());
    assert_eq!(response.usage.input_tokens, 9);
    assert_eq!(response.usage.output_tokens, 3);

    let requests = transport.requests();
    assert_eq!(requests[0].model, "gpt-4o");
    assert_eq!(requests[0].stream, None);
    assert_eq!(requests[0].messages.len(), 2);
}

#[tokio::test]
async fn test_send_maps_tool_calls() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Ok(response(json!({
        "id": "chatcmpl-2",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "lookup", "arguments": "{\"q\":\"rust\"}"}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }))));
    let provider = scripted_provider(&transport);

    let response = provider
        .send_messages(&CancellationToken::new(), &[Message::user("search")], &[])
        .await
        .unwrap();

    assert_eq!(response.content, "");
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);
    assert_eq!(
        response.tool_calls,
        vec![ToolCall::new("call_1", "lookup", "{\"q\":\"rust\"}")]
    );
}

#[tokio::test]
async fn test_zero_choices_is_protocol_error() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Ok(response(json!({"id": "x", "choices": []}))));
    let provider = scripted_provider(&transport);

    let result = provider
        .send_messages(&CancellationToken::new(), &[Message::user("hi")], &[])
        .await;

    assert!(matches!(result, Err(ProviderError::Protocol(_))));
}

#[tokio::test]
async fn test_client_error_fails_without_retry() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Err(ProviderError::api(400, "bad request")));
    transport.push_completion(Ok(ok_response()));
    let provider = scripted_provider(&transport);

    let result = provider
        .send_messages(&CancellationToken::new(), &[Message::user("hi")], &[])
        .await;

    assert_eq!(result, Err(ProviderError::api(400, "bad request")));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_exhaust_retries() {
    let transport = ScriptedTransport::new();
    for _ in 0..8 {
        transport.push_completion(Err(ProviderError::api(503, "unavailable")));
    }
    let provider = scripted_provider(&transport);

    let started = tokio::time::Instant::now();
    let result = provider
        .send_messages(&CancellationToken::new(), &[Message::user("hi")], &[])
        .await;

    assert_eq!(
        result,
        Err(ProviderError::max_retries(ProviderError::api(503, "unavailable")))
    );
    assert_eq!(transport.requests().len(), 8);
    // 1s + 2s + ... + 64s of backoff between the eight attempts
    assert!(started.elapsed() >= Duration::from_secs(127));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_then_success() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Err(ProviderError::Api {
        status: 429,
        message: "slow down".into(),
        retry_after: Some(Duration::from_millis(1500)),
    }));
    transport.push_completion(Ok(ok_response()));
    let provider = scripted_provider(&transport);

    let started = tokio::time::Instant::now();
    let response = provider
        .send_messages(&CancellationToken::new(), &[Message::user("hi")], &[])
        .await
        .unwrap();

    assert_eq!(response.content, "Hi there");
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_backoff() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Err(ProviderError::api(500, "boom")));
    let provider = scripted_provider(&transport);
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = provider
        .send_messages(&cancel, &[Message::user("hi")], &[])
        .await;
    tokio_test::assert_err!(&result);
    assert_eq!(result, Err(ProviderError::Cancelled));
}

#[tokio::test]
async fn test_empty_messages_are_dropped() {
    let transport = ScriptedTransport::new();
    transport.push_completion(Ok(ok_response()));
    let provider = scripted_provider(&transport);

    let history = vec![
        Message::user("first"),
        Message::new(chatwire_core::protocol::MessageRole::Assistant, vec![]),
        Message::user("second"),
    ];
    provider
        .send_messages(&CancellationToken::new(), &history, &[])
        .await
        .unwrap();

    // system + two user messages
    assert_eq!(transport.requests()[0].messages.len(), 3);
}

#[test]
fn test_factory_rejects_unknown_provider() {
    let result = new_provider_by_id("azure", ProviderClientOptions::new());
    let Err(error) = result else {
        panic!("expected an error");
    };
    assert_eq!(error, ProviderError::UnsupportedProvider("azure".into()));
    assert_eq!(error.to_string(), "provider not supported: azure");
}

#[test]
fn test_factory_exposes_model() {
    let model = get_model(INFINEON_GPT4O).unwrap().clone();
    let provider = new_provider_by_id(
        ModelProvider::Infineon.as_str(),
        ProviderClientOptions::new()
            .with_api_key("sk-test")
            .with_model(model.clone()),
    )
    .unwrap();

    assert_eq!(provider.model().id, model.id);
    assert_eq!(provider.model().provider, ModelProvider::Infineon);
}
