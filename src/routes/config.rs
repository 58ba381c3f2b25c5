//! Configuration introspection endpoint
//!
//! Reports the resolved backend without exposing secrets.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{backend::resolve, AppState};

/// Public view of the running configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigInfo {
    pub backend: String,
    pub backend_url: String,
    pub served_model_name: String,
    pub auth_enabled: bool,
}

pub async fn config_info(State(state): State<Arc<AppState>>) -> Json<ConfigInfo> {
    let endpoint = resolve(&state.config);

    Json(ConfigInfo {
        backend: endpoint.identifier,
        backend_url: endpoint.base_url,
        served_model_name: state.config.served_model_name.clone(),
        auth_enabled: state.authenticator.is_enabled(),
    })
}
