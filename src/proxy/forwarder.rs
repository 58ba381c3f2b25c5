//! Request forwarding to the resolved backend
//!
//! One forwarder serves every backend kind: the endpoint is resolved per
//! request and the path is never rewritten, since all supported backends
//! expose the same OpenAI-style routes.

use std::error::Error as StdError;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method},
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tracing::Instrument;

use crate::{
    backend::{resolve, BackendEndpoint},
    config::Config,
    error::{AppError, AppResult},
    metrics::record_backend_error,
    proxy::{
        headers::build_forward_headers,
        logging::RequestContext,
        response::{
            is_event_stream, relay_stream, ProxyResponse, RelayBody, DEFAULT_CONTENT_TYPE,
        },
    },
};

/// Inbound request as seen by the forwarder
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string, forwarded verbatim
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyRequest {
    /// Read an axum request, collecting its body
    pub async fn from_request(request: Request) -> AppResult<Self> {
        let (parts, body) = request.into_parts();

        let body = body
            .collect()
            .await
            .map_err(|e| AppError::InvalidRequestBody(e.to_string()))?
            .to_bytes();

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        })
    }
}

/// Relays requests to the configured backend
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Build the shared backend client.
    ///
    /// Only the connect phase is bounded. There is no read or total timeout,
    /// since generations may run for minutes.
    ///
    /// Limitation: reqwest has no write or pool-acquisition timeout, so a
    /// backend that accepts the connection but never reads the request body
    /// stalls the request instead of producing a 504.
    pub fn build_client(config: &Config) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(100)
            .build()
    }

    /// Forward `request` to `target_path` on the active backend
    pub async fn forward(
        &self,
        request: ProxyRequest,
        target_path: &str,
    ) -> AppResult<ProxyResponse> {
        let endpoint = resolve(&self.config);
        let ctx = RequestContext::new(&endpoint.identifier, target_path);
        let span = ctx.create_span();

        self.dispatch(endpoint, request, target_path, ctx)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        endpoint: BackendEndpoint,
        request: ProxyRequest,
        target_path: &str,
        ctx: RequestContext,
    ) -> AppResult<ProxyResponse> {
        ctx.log_request_start(request.method.as_str());

        let mut url = endpoint.url_for(target_path);
        if let Some(query) = request.query.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        let headers = build_forward_headers(&request.headers);
        ctx.log_upstream_request(&url, headers.len(), request.body.len());

        let mut builder = self.client.request(request.method, &url).headers(headers);
        // An empty body is sent as absent so GET-like calls carry no framing
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| translate_error(&ctx, &url, e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        let ctx = ctx.with_streaming(is_event_stream(&content_type));
        ctx.log_upstream_response(
            status.as_u16(),
            &String::from_utf8_lossy(content_type.as_bytes()),
        );

        let body = if ctx.streaming {
            RelayBody::Streamed(Box::pin(relay_stream(
                Box::pin(response.bytes_stream()),
                ctx,
            )))
        } else {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| translate_error(&ctx, &url, e))?;
            ctx.log_buffered_complete(bytes.len());
            RelayBody::Buffered(bytes)
        };

        Ok(ProxyResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Map a transport failure to the client-facing error.
///
/// Timeouts are checked first: a connect timeout is also a connect error.
fn translate_error(ctx: &RequestContext, url: &str, e: reqwest::Error) -> AppError {
    let cause = error_chain(&e);

    if e.is_timeout() {
        ctx.log_timeout(&cause, url);
        record_backend_error(&ctx.backend, "timeout");
        return AppError::BackendTimeout {
            backend: ctx.backend.clone(),
            cause,
        };
    }

    if e.is_connect() {
        ctx.log_connection_error(&cause, url);
        record_backend_error(&ctx.backend, "connect");
    } else {
        ctx.log_error(&cause);
        record_backend_error(&ctx.backend, "transport");
    }

    AppError::BackendUnreachable {
        backend: ctx.backend.clone(),
        cause,
    }
}

/// Render an error with its sources, e.g.
/// `error sending request: tcp connect error: Connection refused`
fn error_chain(e: &(dyn StdError + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
