//! Route table and /config integration tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, test_config, test_config_with_auth, test_server};
use crate::mocks::MockBackend;

#[tokio::test]
async fn test_models_is_forwarded_with_query() {
    let backend = MockBackend::start().await;
    backend.mock_models("qwen").await;
    let server = test_server(test_config("vllm", &backend.uri()));

    let response = server.get("/v1/models?verbose=true").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"][0]["id"], "qwen");

    let received = backend.received_requests().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("verbose=true"));
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn test_embeddings_and_completions_are_forwarded() {
    let backend = MockBackend::start().await;
    backend.mock_embeddings().await;
    backend.mock_completion().await;
    let server = test_server(test_config("ollama", &backend.uri()));

    let response = server
        .post("/v1/embeddings")
        .json(&json!({"model": "nomic-embed-text", "input": "hello"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"][0]["embedding"], json!([0.1, 0.2, 0.3]));

    let response = server
        .post("/v1/completions")
        .json(&json!({"model": "m", "prompt": "ping"}))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_wrong_method_is_not_forwarded() {
    let backend = MockBackend::start().await;
    let server = test_server(test_config("vllm", &backend.uri()));

    let response = server.get("/v1/chat/completions").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert!(backend.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_not_forwarded() {
    let backend = MockBackend::start().await;
    let server = test_server(test_config("vllm", &backend.uri()));

    server
        .post("/v1/audio/speech")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(backend.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_config_endpoint() {
    let server = test_server(test_config_with_auth("ollama", "http://gpu-box:11434/"));

    let response = server.get("/config").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "backend": "ollama",
            "backend_url": "http://gpu-box:11434",
            "served_model_name": constants::TEST_MODEL_NAME,
            "auth_enabled": true
        })
    );
    assert!(!response.text().contains(constants::TEST_API_KEY));
}

#[tokio::test]
async fn test_config_endpoint_without_override() {
    let server = test_server(test_config("unknown-backend", ""));

    let json: Value = server.get("/config").await.json();

    assert_eq!(json["backend"], "unknown-backend");
    assert_eq!(json["backend_url"], "http://llm-vllm:8000");
    assert_eq!(json["auth_enabled"], false);
}
