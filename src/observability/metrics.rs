//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status
//! - `http_request_duration_seconds` (histogram): latency by method
//! - `http_failures_total` (counter): normalized failures by error type
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with a scrape listener on `addr`.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

pub fn record_request(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_failure(error_type: &str) {
    metrics::counter!("http_failures_total", "type" => error_type.to_string()).increment(1);
}
