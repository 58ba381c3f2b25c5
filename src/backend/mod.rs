//! Backend resolution
//!
//! Maps the configured backend identifier (or an explicit URL override) to the
//! endpoint every forwarded request is sent to. Resolution is a pure in-memory
//! lookup and runs once per request.

pub mod health;

pub use health::{DeepHealth, HealthProber, HealthStatus, ShallowHealth};

use crate::config::Config;

/// Probe path used for identifiers without a dedicated entry
pub const DEFAULT_HEALTH_PROBE_PATH: &str = "/health";

/// Supported inference servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Vllm,
    Ollama,
    LlamaCpp,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [Self::Vllm, Self::Ollama, Self::LlamaCpp];

    /// Look up a backend by identifier (case-insensitive, surrounding whitespace ignored)
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(identifier))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vllm => "vllm",
            Self::Ollama => "ollama",
            Self::LlamaCpp => "llamacpp",
        }
    }

    /// In-network address of the backend container
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Vllm => "http://llm-vllm:8000",
            Self::Ollama => "http://llm-ollama:11434",
            Self::LlamaCpp => "http://llm-llamacpp:8080",
        }
    }

    /// Path answering 200 when the backend is up.
    ///
    /// Ollama has no `/health`; listing local models is its cheapest liveness signal.
    pub fn health_probe_path(&self) -> &'static str {
        match self {
            Self::Vllm => "/health",
            Self::Ollama => "/api/tags",
            Self::LlamaCpp => "/health",
        }
    }
}

/// The backend a request is addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoint {
    /// Configured identifier, used for logging and probe-path lookup only
    pub identifier: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub health_probe_path: &'static str,
}

impl BackendEndpoint {
    /// Absolute URL for `path` on this backend
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Resolve the active backend endpoint from configuration.
///
/// A non-empty override URL wins unconditionally. Otherwise the identifier is
/// looked up, falling back to the default backend for unknown values.
pub fn resolve(config: &Config) -> BackendEndpoint {
    let identifier = config.backend.trim().to_lowercase();
    let kind = BackendKind::from_identifier(&identifier);

    let override_url = config.backend_url_override.trim().trim_end_matches('/');
    let base_url = if override_url.is_empty() {
        kind.unwrap_or_default().default_base_url().to_string()
    } else {
        override_url.to_string()
    };

    let health_probe_path = kind
        .map(|kind| kind.health_probe_path())
        .unwrap_or(DEFAULT_HEALTH_PROBE_PATH);

    BackendEndpoint {
        identifier,
        base_url,
        health_probe_path,
    }
}
