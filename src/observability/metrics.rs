//! Metrics collection.
//!
//! # Responsibilities
//! - Define upstream RPC metrics (calls, latency, health)
//! - Track per-upstream and per-method series
//!
//! # Metrics
//! - `upstream_rpc_requests_total` (counter): calls by upstream, method, outcome
//! - `upstream_rpc_request_duration_seconds` (histogram): round-trip latency
//! - `upstream_health` (gauge): 1=alive, 0=sick
//! - `upstream_failure_streaks_total` (counter): failure streaks opened while alive
//!
//! # Design Decisions
//! - Facade only; the host process installs the recorder and exporter
//! - Without a recorder every call here is a no-op

use std::time::Instant;

/// Record one finished RPC call.
pub fn record_request(upstream: &str, method: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "upstream_rpc_requests_total",
        "upstream" => upstream.to_string(),
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "upstream_rpc_request_duration_seconds",
        "upstream" => upstream.to_string(),
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the health flag of an upstream.
pub fn record_upstream_health(upstream: &str, healthy: bool) {
    metrics::gauge!("upstream_health", "upstream" => upstream.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Count a failure streak that started while the upstream was alive.
pub fn record_failure_streak(upstream: &str) {
    metrics::counter!("upstream_failure_streaks_total", "upstream" => upstream.to_string())
        .increment(1);
}
