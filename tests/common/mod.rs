//! Common test utilities for the proxy
//!
//! Shared fixtures and helpers to stand up the real router against a mock
//! backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::json;

use llm_proxy::{routes::create_router, AppState, Config};

/// Test configuration constants
pub mod constants {
    /// Secret clients must present when auth is enabled
    pub const TEST_API_KEY: &str = "test-proxy-secret";
    /// Model name reported by /config
    pub const TEST_MODEL_NAME: &str = "qwen2.5-7b-instruct";
}

/// Configuration pointing at `backend_url` with auth disabled
pub fn test_config(backend: &str, backend_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        backend: backend.to_string(),
        backend_url_override: backend_url.to_string(),
        served_model_name: constants::TEST_MODEL_NAME.to_string(),
        ..Config::default()
    }
}

/// Same as [`test_config`] with the test secret configured
pub fn test_config_with_auth(backend: &str, backend_url: &str) -> Config {
    Config {
        api_key: constants::TEST_API_KEY.to_string(),
        ..test_config(backend, backend_url)
    }
}

/// Router under test, built exactly as in production
pub fn test_server(config: Config) -> TestServer {
    let state = AppState::new(config).expect("Failed to build app state");
    TestServer::new(create_router(Arc::new(state))).expect("Failed to create test server")
}

/// Router whose backend client gives up after `timeout`
pub fn test_server_with_backend_timeout(config: Config, timeout: Duration) -> TestServer {
    let backend_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to build backend client");
    let probe_client = reqwest::Client::new();

    let state = AppState::with_clients(config, backend_client, probe_client);
    TestServer::new(create_router(Arc::new(state))).expect("Failed to create test server")
}

/// `Authorization` header value for `token`
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

pub fn chat_request(stream: bool) -> serde_json::Value {
    json!({
        "model": constants::TEST_MODEL_NAME,
        "messages": [{"role": "user", "content": "Say pong"}],
        "stream": stream
    })
}
