//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waypoint_provider_attempts_total` (counter): outbound attempts by
//!   endpoint and outcome (success, timeout, http_error, circuit_open)
//! - `waypoint_provider_attempt_duration_seconds` (histogram): attempt
//!   latency by endpoint
//! - `waypoint_breaker_state` (gauge): 0=closed, 1=open, 2=half_open
//! - `waypoint_queries_total` (counter): inbound queries by disposition
//!
//! # Design Decisions
//! - Low-overhead updates; recording is safe before the exporter installs
//!   (metrics fall into the no-op recorder)
//! - Labels are static strings to keep cardinality flat

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::BreakerState;

/// Install the Prometheus exporter and its exposition endpoint.
///
/// Must run inside the tokio runtime; exposition is served on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one outbound attempt.
///
/// `duration` is absent for circuit-open rejections, which never start a
/// request.
pub fn record_attempt(endpoint: &'static str, outcome: &'static str, duration: Option<Duration>) {
    metrics::counter!(
        "waypoint_provider_attempts_total",
        "endpoint" => endpoint,
        "outcome" => outcome
    )
    .increment(1);

    if let Some(duration) = duration {
        metrics::histogram!(
            "waypoint_provider_attempt_duration_seconds",
            "endpoint" => endpoint
        )
        .record(duration.as_secs_f64());
    }
}

/// Record a breaker state transition.
pub fn record_breaker_state(endpoint: &'static str, state: BreakerState) {
    let value = match state {
        BreakerState::Closed => 0.0,
        BreakerState::Open => 1.0,
        BreakerState::HalfOpen => 2.0,
    };
    metrics::gauge!("waypoint_breaker_state", "endpoint" => endpoint).set(value);
}

/// Record one inbound query by how it was answered.
pub fn record_query(disposition: &'static str) {
    metrics::counter!("waypoint_queries_total", "disposition" => disposition).increment(1);
}
