//! Prometheus metrics
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed. The exporter serves on its own port so the proxy's
//! HTTP surface is unchanged.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr` (call once at startup)
pub fn init_metrics(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    register_metrics();
    Ok(())
}

fn register_metrics() {
    metrics::describe_counter!(
        "llm_proxy_requests_total",
        "Total number of forwarded requests"
    );
    metrics::describe_histogram!(
        "llm_proxy_request_duration_seconds",
        "Time until the backend response headers were relayed"
    );
    metrics::describe_counter!(
        "llm_proxy_backend_errors_total",
        "Backend transport failures by kind"
    );
    metrics::describe_counter!(
        "llm_proxy_streamed_bytes_total",
        "Bytes relayed on streamed responses"
    );
}

/// Record a forwarded request
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "llm_proxy_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("llm_proxy_request_duration_seconds", "route" => route.to_string())
        .record(duration_secs);
}

/// Record a transport failure (`connect`, `timeout`, `transport`)
pub fn record_backend_error(backend: &str, kind: &'static str) {
    metrics::counter!(
        "llm_proxy_backend_errors_total",
        "backend" => backend.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record bytes relayed on a streamed response
pub fn record_streamed_bytes(route: &str, bytes: u64) {
    metrics::counter!("llm_proxy_streamed_bytes_total", "route" => route.to_string())
        .increment(bytes);
}
