//! Configuration management for the proxy
//!
//! Configuration is loaded from environment variables once at startup and is
//! immutable afterwards. Components receive it by value (behind `Arc`).

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default connect timeout towards the backend
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for the deep health probe
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Backend identifier (`vllm`, `ollama`, `llamacpp`), lower-cased and trimmed
    pub backend: String,
    /// Explicit backend base URL; wins over the identifier lookup when non-empty
    pub backend_url_override: String,

    /// Bearer secret clients must present. Empty disables authentication.
    pub api_key: String,
    /// Model name reported by `/config`
    pub served_model_name: String,

    /// Connect timeout for forwarded requests
    pub connect_timeout: Duration,
    /// Total timeout for the deep health probe
    pub health_timeout: Duration,

    /// Port for the Prometheus exporter; no exporter when unset
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend: "vllm".to_string(),
            backend_url_override: String::new(),
            api_key: String::new(),
            served_model_name: "local-model".to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("PROXY_HOST").unwrap_or(defaults.host),
            port: env::var("PROXY_PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("Invalid PROXY_PORT")?,

            backend: env::var("LLM_BACKEND")
                .unwrap_or(defaults.backend)
                .trim()
                .to_lowercase(),
            backend_url_override: env::var("LLM_BACKEND_URL")
                .unwrap_or_default()
                .trim()
                .to_string(),

            api_key: env::var("API_KEY").unwrap_or_default().trim().to_string(),
            served_model_name: env::var("SERVED_MODEL_NAME")
                .unwrap_or(defaults.served_model_name)
                .trim()
                .to_string(),

            connect_timeout: parse_secs("BACKEND_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(defaults.connect_timeout),
            health_timeout: parse_secs("HEALTH_TIMEOUT_SECS")?
                .unwrap_or(defaults.health_timeout),

            metrics_port: env::var("METRICS_PORT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().parse())
                .transpose()
                .context("Invalid METRICS_PORT")?,
        })
    }

    /// Whether clients must present a bearer token
    pub fn auth_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn parse_secs(var: &str) -> Result<Option<Duration>> {
    match env::var(var) {
        Ok(value) => {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}", var))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
