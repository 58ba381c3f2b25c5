//! Request logging utilities for backend forwarding
//!
//! Provides structured logging with correlation IDs so a single forwarded
//! request can be followed from dispatch to the last relayed chunk.

use std::time::Instant;
use tracing::{debug, error, info, Span};
use uuid::Uuid;

/// Context for tracking a forwarded request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Backend identifier handling this request
    pub backend: String,
    /// Path forwarded to the backend
    pub endpoint: String,
    /// Whether the backend answered with an event stream
    pub streaming: bool,
}

impl RequestContext {
    pub fn new(backend: &str, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            backend: backend.to_string(),
            endpoint: endpoint.to_string(),
            streaming: false,
        }
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_request_start(&self, method: &str) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            method = %method,
            "Request started"
        );
    }

    pub fn log_upstream_request(&self, url: &str, header_count: usize, body_size: usize) {
        debug!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            url = %url,
            header_count = %header_count,
            body_size = %body_size,
            "Sending request to backend"
        );
    }

    pub fn log_upstream_response(&self, status: u16, content_type: &str) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            status = %status,
            content_type = %content_type,
            streaming = %self.streaming,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from backend"
        );
    }

    pub fn log_buffered_complete(&self, bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            bytes = %bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Buffered response relayed"
        );
    }

    pub fn log_stream_ended(&self, chunks: usize, bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            chunks = %chunks,
            bytes = %bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    /// The client went away before the backend finished
    pub fn log_stream_abandoned(&self, chunks: usize, bytes: usize) {
        info!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            chunks = %chunks,
            bytes = %bytes,
            elapsed_ms = %self.elapsed_ms(),
            "Client disconnected, closing backend stream"
        );
    }

    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
            streaming = %self.streaming,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }

    pub fn log_connection_error(&self, error: &str, url: &str) {
        error!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to backend failed"
        );
    }

    pub fn log_timeout(&self, error: &str, url: &str) {
        error!(
            trace_id = %self.trace_id,
            backend = %self.backend,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request to backend timed out"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "forward",
            trace_id = %self.trace_id,
            backend = %self.backend,
            endpoint = %self.endpoint,
        )
    }
}
