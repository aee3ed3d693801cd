//! End-to-end dispatch tests against a wiremock backend double: request
//! shape on both transport paths, error surfacing, and SSE streaming.

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use wirechat::client::{ChatClient, ChatConfig};
use wirechat::error::ChatError;
use wirechat::types::{ChatOptions, FunctionCall, Message, StreamEvent, ToolCall};

fn client_for(server: &MockServer, model: &str) -> ChatClient {
    ChatClient::new(ChatConfig {
        model_name: model.to_string(),
        model_id: format!("{model}-id"),
        base_url: server.uri(),
        api_key: "test-key".to_string(),
    })
}

fn completion_response() -> Value {
    json!({
        "choices": [{
            "message": {
                "content": "It is sunny.",
                "tool_calls": [{
                    "id": "c1",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"city\":\"SF\"}"}
                }]
            },
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
    })
}

#[tokio::test]
async fn standard_path_maps_first_choice_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .and(|req: &Request| {
            let Ok(body) = serde_json::from_slice::<Value>(&req.body) else {
                return false;
            };
            // Zero-valued numeric options must be absent, not zero.
            body["model"] == json!("gpt-4o")
                && body.get("temperature").is_none()
                && body.get("stream").is_none()
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let response = client
        .chat(&[Message::user("weather?")], Some(&ChatOptions::default()))
        .await
        .expect("chat ok");

    assert_eq!(response.content, "It is sunny.");
    assert_eq!(response.finish_reason, "stop");
    assert_eq!(response.usage.total_tokens, 19);
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].function.name, "get_weather");
}

#[tokio::test]
async fn raw_path_body_carries_thinking_quirks_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(|req: &Request| {
            let Ok(body) = serde_json::from_slice::<Value>(&req.body) else {
                return false;
            };
            // Synchronous raw calls force thinking off at the top level even
            // though the caller asked for it; the kwargs flag keeps the
            // caller's value.
            body["enable_thinking"] == json!(false)
                && body["chat_template_kwargs"] == json!({"enable_thinking": true})
                && body["messages"][1]["tool_calls"][0]["id"] == json!("c1")
                && body["messages"][2]["tool_call_id"] == json!("c1")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Tool-call history routes this conversation to the raw path.
    let messages = vec![
        Message::user("look up x"),
        Message::assistant_with_tool_calls(
            "",
            vec![ToolCall {
                id: "c1".to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: "get_doc".to_string(),
                    arguments: "{\"x\":1}".to_string(),
                },
            }],
        ),
        Message::tool("c1", "the doc"),
    ];
    let options = ChatOptions {
        thinking: Some(true),
        ..Default::default()
    };

    let client = client_for(&server, "qwen3-max");
    let response = client.chat(&messages, Some(&options)).await.expect("chat ok");
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn non_200_surfaces_status_and_body_with_no_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client
        .chat(&[Message::user("hi")], None)
        .await
        .expect_err("should fail");

    match err {
        ChatError::Backend { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected backend error, got {other}"),
    }
}

#[tokio::test]
async fn zero_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"choices": [], "usage": {}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client
        .chat(&[Message::user("hi")], None)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ChatError::EmptyResponse));
}

#[tokio::test]
async fn malformed_conversation_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client
        .chat(&[Message::tool("", "orphan result")], None)
        .await
        .expect_err("should fail");
    assert!(matches!(err, ChatError::InvalidMessage(_)));
}

fn sse_body(frames: &[&str]) -> String {
    frames
        .iter()
        .map(|data| format!("data: {data}\n\n"))
        .collect()
}

async fn collect_events(mut rx: tokio::sync::mpsc::Receiver<StreamEvent>) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn streaming_reassembles_tool_calls_and_ends_with_terminal_event() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"name":"get"}}]}}]}"#,
        r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","function":{"name":"_doc","arguments":"{"}}]}}]}"#,
        r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"\"x\":1}"}}]}}]}"#,
        r#"{"choices":[{"delta":{},"finish_reason":"tool_calls"}]}"#,
        "[DONE]",
    ]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(|req: &Request| {
            serde_json::from_slice::<Value>(&req.body)
                .is_ok_and(|body| body["stream"] == json!(true))
        })
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let rx = client
        .chat_stream(&[Message::user("look up x")], None)
        .await
        .expect("stream ok");
    let events = collect_events(rx).await;

    assert_eq!(
        events[0],
        StreamEvent::ToolCallStarted {
            tool_name: "get_doc".to_string(),
            tool_call_id: "c1".to_string(),
        }
    );
    // Terminal frame snapshot plus the unconditional end-of-sequence event.
    assert_eq!(events.len(), 3);
    for event in &events[1..] {
        let StreamEvent::Answer {
            content,
            done,
            tool_calls,
        } = event
        else {
            panic!("expected answer event, got {event:?}");
        };
        assert!(content.is_empty());
        assert!(done);
        let calls = tool_calls.as_ref().expect("snapshot");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "c1");
        assert_eq!(calls[0].function.name, "get_doc");
        assert_eq!(calls[0].function.arguments, "{\"x\":1}");
    }
}

#[tokio::test]
async fn stream_without_terminal_frame_still_emits_one_final_event() {
    let server = MockServer::start().await;
    // Only tool-call frames; the connection just ends.
    let body = sse_body(&[
        r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","function":{"name":"get_doc","arguments":"{}"}}]}}]}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let rx = client
        .chat_stream(&[Message::user("hi")], None)
        .await
        .expect("stream ok");
    let events = collect_events(rx).await;

    assert_eq!(events.len(), 1);
    let StreamEvent::Answer {
        content,
        done,
        tool_calls,
    } = &events[0]
    else {
        panic!("expected answer event");
    };
    assert!(content.is_empty());
    assert!(done);
    assert_eq!(tool_calls.as_ref().unwrap()[0].function.name, "get_doc");
}

#[tokio::test]
async fn streaming_text_deltas_arrive_in_order() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"choices":[{"delta":{"content":"Hel"}}]}"#,
        r#"{"choices":[{"delta":{"content":"lo"}}]}"#,
        "[DONE]",
    ]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let rx = client
        .chat_stream(&[Message::user("hi")], None)
        .await
        .expect("stream ok");
    let events = collect_events(rx).await;

    let text: String = events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Answer { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "Hello");
    assert_eq!(events.last().map(StreamEvent::is_done), Some(true));
}

#[tokio::test]
async fn streaming_preflight_failure_returns_error_not_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client
        .chat_stream(&[Message::user("hi")], None)
        .await
        .expect_err("should fail before any event");
    match err {
        ChatError::Backend { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad key");
        }
        other => panic!("expected backend error, got {other}"),
    }
}

#[tokio::test]
async fn accessors_report_configured_identity() {
    let server = MockServer::start().await;
    let client = client_for(&server, "gpt-4o");
    assert_eq!(client.model_name(), "gpt-4o");
    assert_eq!(client.model_id(), "gpt-4o-id");
}
