//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): routing decisions by kind
//! - `gate_redirects_total` (counter): redirects by reason
//! - `gate_upstream_requests_total` (counter): forwarded requests by status
//! - `gate_upstream_duration_seconds` (histogram): upstream latency
//! - `gate_config_reloads_total` (counter): hot reloads by result
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs a recorder
//! - Labels are small closed sets (no paths)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(kind: &'static str) {
    metrics::counter!("gate_requests_total", "decision" => kind).increment(1);
}

pub fn record_redirect(reason: &'static str) {
    metrics::counter!("gate_redirects_total", "reason" => reason).increment(1);
}

pub fn record_upstream(status: u16, start: Instant) {
    metrics::counter!("gate_upstream_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("gate_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_config_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("gate_config_reloads_total", "result" => result).increment(1);
}
