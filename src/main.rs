//! LLM Proxy - OpenAI-compatible reverse proxy for local inference backends
//!
//! This is the main entry point for the proxy server.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};

use llm_proxy::{metrics, resolve, routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting LLM Proxy");

    // Load configuration
    let config = Config::from_env()?;
    let endpoint = resolve(&config);
    info!(
        backend = %endpoint.identifier,
        backend_url = %endpoint.base_url,
        auth_enabled = config.auth_enabled(),
        "Configuration loaded successfully"
    );

    if let Some(port) = config.metrics_port {
        let metrics_addr: SocketAddr = format!("{}:{}", config.host, port).parse()?;
        metrics::init_metrics(metrics_addr)?;
        info!("Metrics exporter listening on {}", metrics_addr);
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Initialize application state
    let state = Arc::new(AppState::new(config)?);
    info!("Application state initialized");

    // Build the router
    let app = routes::create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("LLM Proxy shutdown complete");
    Ok(())
}

/// `LOG_FORMAT=json` selects structured JSON output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "llm_proxy=info,tower_http=info".into());

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    }
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating shutdown");
        }
    }
}
