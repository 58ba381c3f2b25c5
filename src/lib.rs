//! LLM Proxy - OpenAI-compatible reverse proxy for local inference backends
//!
//! Forwards OpenAI-style requests to a vLLM, Ollama or llama.cpp server,
//! relaying buffered and server-sent-event responses, with optional bearer
//! authentication and backend-aware health checks.

pub mod backend;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};

pub use crate::backend::{resolve, BackendEndpoint, BackendKind, HealthProber};
pub use crate::config::Config;
pub use crate::middleware::auth::Authenticator;
pub use crate::proxy::Forwarder;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Arc<Config>,
    pub authenticator: Authenticator,
    /// Forwards requests over the shared backend connection pool
    pub forwarder: Forwarder,
    pub prober: HealthProber,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let backend_client =
            Forwarder::build_client(&config).context("Failed to build backend HTTP client")?;
        let probe_client =
            HealthProber::build_client(&config).context("Failed to build health probe client")?;

        Ok(Self::assemble(config, backend_client, probe_client))
    }

    /// Create a new application state with injected HTTP clients
    ///
    /// Lets tests shorten timeouts without touching the configuration.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_clients(
        config: Config,
        backend_client: reqwest::Client,
        probe_client: reqwest::Client,
    ) -> Self {
        Self::assemble(config, backend_client, probe_client)
    }

    fn assemble(
        config: Config,
        backend_client: reqwest::Client,
        probe_client: reqwest::Client,
    ) -> Self {
        let config = Arc::new(config);

        Self {
            authenticator: Authenticator::new(config.api_key.clone()),
            forwarder: Forwarder::new(backend_client, config.clone()),
            prober: HealthProber::new(probe_client, config.clone()),
            config,
        }
    }
}
