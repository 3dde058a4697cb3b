//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (requests, latency, registered endpoints)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by endpoint, method, status
//! - `proxy_request_duration_seconds` (histogram): time to upstream response head
//! - `proxy_registered_endpoints` (gauge): endpoints mounted at startup
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels for endpoint name, method, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one forwarded request.
pub fn record_request(endpoint: &str, method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "proxy_requests_total",
        "endpoint" => endpoint.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "proxy_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the number of endpoints mounted at startup.
pub fn record_registered_endpoints(count: usize) {
    ::metrics::gauge!("proxy_registered_endpoints").set(count as f64);
}
