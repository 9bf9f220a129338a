//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests seen by the logger
//! - `gateway_proxied_requests_total` (counter): forwarded requests by method, status, backend
//! - `gateway_request_duration_seconds` (histogram): upstream latency by backend
//! - `gateway_upstream_errors_total` (counter): unreachable backend, by backend
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one inbound request.
pub fn record_inbound() {
    metrics::counter!("gateway_requests_total").increment(1);
}

/// Record a completed upstream exchange.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    metrics::counter!(
        "gateway_proxied_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "backend" => backend.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Count a transport failure talking to `backend`.
pub fn record_upstream_error(backend: &str) {
    metrics::counter!("gateway_upstream_errors_total", "backend" => backend.to_string()).increment(1);
}
