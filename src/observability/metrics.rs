//! Metrics collection and exposition.
//!
//! # Metrics
//! - `svwatch_ticks_total` (counter): completed ticks
//! - `svwatch_probe_failures_total` (counter): ticks lost to discovery or probe errors
//! - `svwatch_service_up` (gauge): 1=up, 0=down, per service
//! - `svwatch_service_uptime_seconds` (gauge): last reported uptime, per service
//! - `svwatch_flapping_alerts_total` (counter): alerts fired, per service
//! - `svwatch_alert_failures_total` (counter): alert commands that failed, per service
//!
//! Updates are no-ops until `init_metrics` installs the exporter.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_tick() {
    counter!("svwatch_ticks_total").increment(1);
}

pub fn record_probe_failure() {
    counter!("svwatch_probe_failures_total").increment(1);
}

pub fn record_service_status(service: &str, uptime_secs: Option<u64>) {
    let up = if uptime_secs.is_some() { 1.0 } else { 0.0 };
    gauge!("svwatch_service_up", "service" => service.to_string()).set(up);
    if let Some(uptime) = uptime_secs {
        gauge!("svwatch_service_uptime_seconds", "service" => service.to_string()).set(uptime as f64);
    }
}

pub fn record_alert(service: &str) {
    counter!("svwatch_flapping_alerts_total", "service" => service.to_string()).increment(1);
}

pub fn record_alert_failure(service: &str) {
    counter!("svwatch_alert_failures_total", "service" => service.to_string()).increment(1);
}
