//! OpenAI-compatible forwarded routes
//!
//! Each entry maps an inbound path and method to the backend path it is
//! relayed to. Bodies are never parsed; streaming is decided by the backend.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    routing::{on, MethodFilter, MethodRouter},
};
use tracing::debug;

use crate::{
    error::AppResult,
    metrics::record_request,
    proxy::{ProxyRequest, ProxyResponse},
    AppState,
};

/// One row of the route table
#[derive(Debug, Clone, Copy)]
pub struct ForwardedRoute {
    pub path: &'static str,
    pub method: MethodFilter,
    /// Path requested from the backend
    pub target: &'static str,
}

pub const FORWARDED_ROUTES: &[ForwardedRoute] = &[
    ForwardedRoute {
        path: "/v1/chat/completions",
        method: MethodFilter::POST,
        target: "/v1/chat/completions",
    },
    ForwardedRoute {
        path: "/v1/completions",
        method: MethodFilter::POST,
        target: "/v1/completions",
    },
    ForwardedRoute {
        path: "/v1/models",
        method: MethodFilter::GET,
        target: "/v1/models",
    },
    ForwardedRoute {
        path: "/v1/embeddings",
        method: MethodFilter::POST,
        target: "/v1/embeddings",
    },
];

impl ForwardedRoute {
    pub fn method_router(&self) -> MethodRouter<Arc<AppState>> {
        let target = self.target;
        on(
            self.method,
            move |State(state): State<Arc<AppState>>, request: Request| {
                forward_request(state, request, target)
            },
        )
    }
}

/// Forward an authenticated request to `target` on the active backend
pub async fn forward_request(
    state: Arc<AppState>,
    request: Request,
    target: &'static str,
) -> AppResult<ProxyResponse> {
    let start_time = Instant::now();
    let proxy_request = ProxyRequest::from_request(request).await?;
    debug!(path = %proxy_request.path, target = %target, "Forwarding request");

    let result = state.forwarder.forward(proxy_request, target).await;

    let status = match &result {
        Ok(response) => response.status.as_u16(),
        Err(e) => e.status_code().as_u16(),
    };
    record_request(target, status, start_time.elapsed().as_secs_f64());

    result
}
