//! Backend health probing
//!
//! Shallow health reflects the current resolution only and never touches the
//! network. Deep health issues a GET against the backend's probe path.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    backend::{resolve, BackendEndpoint},
    config::Config,
    metrics::record_backend_error,
};

/// Health status reported to clients
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Unhealthy,
}

impl HealthStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HealthStatus::Ok => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Liveness of the proxy itself
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShallowHealth {
    pub status: HealthStatus,
    pub backend: String,
    pub backend_url: String,
}

/// Result of probing the backend
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeepHealth {
    pub status: HealthStatus,
    pub backend: String,
    pub backend_url: String,
    /// Raw status code returned by the probe path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_status: Option<u16>,
    /// Transport error when the backend could not be reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reports proxy and backend health
#[derive(Clone)]
pub struct HealthProber {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl HealthProber {
    /// `client` must carry the probe timeout
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Build the probe client for `config`
    pub fn build_client(config: &Config) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(config.health_timeout)
            .build()
    }

    pub fn shallow_health(&self) -> ShallowHealth {
        let endpoint = resolve(&self.config);
        ShallowHealth {
            status: HealthStatus::Ok,
            backend: endpoint.identifier,
            backend_url: endpoint.base_url,
        }
    }

    pub async fn deep_health(&self) -> DeepHealth {
        let endpoint = resolve(&self.config);
        self.probe(endpoint).await
    }

    async fn probe(&self, endpoint: BackendEndpoint) -> DeepHealth {
        let url = endpoint.url_for(endpoint.health_probe_path);
        debug!(backend = %endpoint.identifier, url = %url, "Probing backend health");

        match self.client.get(&url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                let status = if code == 200 {
                    HealthStatus::Ok
                } else {
                    warn!(
                        backend = %endpoint.identifier,
                        status = code,
                        "Backend probe returned non-200"
                    );
                    HealthStatus::Unhealthy
                };

                DeepHealth {
                    status,
                    backend: endpoint.identifier,
                    backend_url: endpoint.base_url,
                    backend_status: Some(code),
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    backend = %endpoint.identifier,
                    url = %url,
                    error = %e,
                    "Backend probe failed"
                );
                let kind = if e.is_timeout() { "timeout" } else { "connect" };
                record_backend_error(&endpoint.identifier, kind);

                DeepHealth {
                    status: HealthStatus::Unhealthy,
                    backend: endpoint.identifier,
                    backend_url: endpoint.base_url,
                    backend_status: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
