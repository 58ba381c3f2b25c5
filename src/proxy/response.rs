//! Relay of backend responses to the client
//!
//! The backend's content type decides, once, whether the body is buffered in
//! full or streamed through chunk by chunk.

use std::pin::Pin;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::{metrics::record_streamed_bytes, proxy::logging::RequestContext};

/// Media type that selects the streamed relay
pub const EVENT_STREAM: &str = "text/event-stream";

/// Content type assumed when the backend sends none
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Stream of body chunks from the backend
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Case-insensitive substring match on the SSE media type
pub fn is_event_stream(content_type: &HeaderValue) -> bool {
    String::from_utf8_lossy(content_type.as_bytes())
        .to_ascii_lowercase()
        .contains(EVENT_STREAM)
}

/// Body of a relayed response
pub enum RelayBody {
    /// Fully read before replying
    Buffered(Bytes),
    /// Relayed as chunks arrive
    Streamed(ByteStream),
}

impl RelayBody {
    pub fn is_streamed(&self) -> bool {
        matches!(self, RelayBody::Streamed(_))
    }
}

impl std::fmt::Debug for RelayBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            RelayBody::Streamed(_) => f.write_str("Streamed"),
        }
    }
}

/// Backend response as handed back to the client
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: RelayBody,
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let body = match self.body {
            RelayBody::Buffered(bytes) => Body::from(bytes),
            RelayBody::Streamed(stream) => Body::from_stream(stream),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, self.content_type);
        response
    }
}

/// Tracks relay progress and reports when the stream is dropped early
struct RelayGuard {
    ctx: RequestContext,
    chunks: usize,
    bytes: usize,
    finished: bool,
}

impl RelayGuard {
    fn record(&mut self, len: usize) {
        self.chunks += 1;
        self.bytes += len;
    }

    fn finish(&mut self) {
        self.finished = true;
        self.ctx.log_stream_ended(self.chunks, self.bytes);
    }
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.ctx.log_stream_abandoned(self.chunks, self.bytes);
        }
        record_streamed_bytes(&self.ctx.endpoint, self.bytes as u64);
    }
}

/// Pass backend chunks through in order, dropping empty ones.
///
/// Dropping the returned stream (client disconnect) drops `upstream`, which
/// closes the backend connection. A backend error ends the relay.
pub fn relay_stream(
    mut upstream: ByteStream,
    ctx: RequestContext,
) -> impl Stream<Item = Result<Bytes, reqwest::Error>> + Send {
    async_stream::stream! {
        let mut guard = RelayGuard {
            ctx,
            chunks: 0,
            bytes: 0,
            finished: false,
        };

        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) if bytes.is_empty() => continue,
                Ok(bytes) => {
                    guard.record(bytes.len());
                    yield Ok(bytes);
                }
                Err(e) => {
                    guard.finished = true;
                    guard.ctx.log_error(&e.to_string());
                    yield Err(e);
                    return;
                }
            }
        }

        guard.finish();
    }
}
