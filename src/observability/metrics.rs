//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sentinel_service_healthy` (gauge): 1 after a healthy probe, 0 otherwise
//! - `sentinel_probes_total` (counter): health probes issued
//! - `sentinel_probe_failures_total` (counter): degraded or unreachable probes
//! - `sentinel_restarts_total` (counter): restart cycles attempted
//! - `sentinel_restart_failures_total` (counter): restart cycles that failed
//!
//! # Design Decisions
//! - Recording helpers are no-ops until the exporter is installed, so
//!   callers never branch on whether metrics are enabled

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr` and register descriptions.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_gauge!(
                "sentinel_service_healthy",
                "1 when the last probe was healthy, 0 otherwise"
            );
            describe_counter!("sentinel_probes_total", "Health probes issued");
            describe_counter!(
                "sentinel_probe_failures_total",
                "Probes that came back degraded or unreachable"
            );
            describe_counter!("sentinel_restarts_total", "Restart cycles attempted");
            describe_counter!(
                "sentinel_restart_failures_total",
                "Restart cycles that failed"
            );
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(error) => {
            tracing::error!(%error, "failed to install metrics exporter");
        }
    }
}

/// Record the outcome of one probe.
pub fn record_probe(healthy: bool) {
    counter!("sentinel_probes_total").increment(1);
    if !healthy {
        counter!("sentinel_probe_failures_total").increment(1);
    }
    gauge!("sentinel_service_healthy").set(if healthy { 1.0 } else { 0.0 });
}

/// Record a completed restart cycle.
pub fn record_restart(success: bool) {
    counter!("sentinel_restarts_total").increment(1);
    if !success {
        counter!("sentinel_restart_failures_total").increment(1);
    }
}
