//! Health check endpoints
//!
//! - `/health` - Proxy liveness and the backend it currently resolves to
//! - `/health/deep` - Probes the backend itself

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    backend::{DeepHealth, ShallowHealth},
    AppState,
};

/// Liveness endpoint. Never fails and performs no I/O.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ShallowHealth> {
    Json(state.prober.shallow_health())
}

/// Deep health endpoint
///
/// Returns 200 when the backend answers its probe path with 200, otherwise 503
/// with the backend status or the transport error.
pub async fn deep_health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<DeepHealth>) {
    let health = state.prober.deep_health().await;
    (health.status.status_code(), Json(health))
}
