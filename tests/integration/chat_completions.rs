//! Chat completions integration tests
//!
//! Tests for POST /v1/chat/completions:
//! - Buffered relay of JSON responses
//! - Streamed relay of server-sent events
//! - Backend error statuses relayed verbatim

use std::time::Duration;

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{
    bearer, chat_request, constants, test_config, test_config_with_auth, test_server,
};
use crate::mocks::{chat_completion_body, spawn_chunked_sse_backend, MockBackend, PONG_EVENTS};

#[tokio::test]
async fn test_non_streaming_body_is_relayed_unmodified() {
    let backend = MockBackend::start().await;
    backend.mock_chat_completion("pong").await;

    let server = test_server(test_config_with_auth("vllm", &backend.uri()));

    let response = server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer(constants::TEST_API_KEY))
        .json(&chat_request(false))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(response.text(), chat_completion_body("pong"));
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"choices": [{"message": {"content": "pong"}}]})
    );
}

#[tokio::test]
async fn test_streaming_events_are_relayed_in_order() {
    let backend = MockBackend::start().await;
    backend.mock_chat_completion_stream(&PONG_EVENTS).await;

    let server = test_server(test_config_with_auth("vllm", &backend.uri()));

    let response = server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer(constants::TEST_API_KEY))
        .json(&chat_request(true))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream; charset=utf-8"
    );
    assert_eq!(response.text(), PONG_EVENTS.concat());
}

#[tokio::test]
async fn test_separately_flushed_chunks_keep_byte_order() {
    let url = spawn_chunked_sse_backend(vec!["A", "", "B", "C"], Duration::from_millis(20)).await;
    let server = test_server(test_config("ollama", &url));

    let response = server
        .post("/v1/chat/completions")
        .json(&chat_request(true))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "ABC");
}

#[tokio::test]
async fn test_backend_error_status_is_relayed_verbatim() {
    let backend = MockBackend::start().await;
    let error_body = json!({"object": "error", "message": "model not found", "code": 404});
    backend.mock_chat_completion_error(404, error_body.clone()).await;

    let server = test_server(test_config("vllm", &backend.uri()));

    let response = server
        .post("/v1/chat/completions")
        .json(&chat_request(false))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<serde_json::Value>(), error_body);
}

#[tokio::test]
async fn test_request_reaches_backend_intact() {
    let backend = MockBackend::start().await;
    backend.mock_chat_completion("pong").await;

    let server = test_server(test_config_with_auth("llamacpp", &backend.uri()));

    server
        .post("/v1/chat/completions")
        .add_header(header::AUTHORIZATION, bearer(constants::TEST_API_KEY))
        .json(&chat_request(false))
        .await
        .assert_status_ok();

    let received = backend.received_requests().await;
    assert_eq!(received.len(), 1);

    let request = &received[0];
    assert_eq!(request.url.path(), "/v1/chat/completions");
    // Authorization is passed through untouched
    assert_eq!(
        request.headers.get("authorization").unwrap(),
        &format!("Bearer {}", constants::TEST_API_KEY)
    );
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, chat_request(false));
}
