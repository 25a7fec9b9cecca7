//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into a ready poller
//! - Start the optional metrics exporter
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Status and alert commands get separate deadlines

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::validation::ValidationError;
use crate::config::{ConfigError, MonitorConfig};
use crate::exec::ProcessRunner;
use crate::monitor::Poller;
use crate::observability::metrics;

/// Build the production poller: real processes with configured deadlines.
pub fn build_poller(config: &MonitorConfig) -> Result<Poller, ConfigError> {
    let probe_runner = Arc::new(ProcessRunner::new(Duration::from_secs(config.probe.timeout_secs)));
    let alert_runner = Arc::new(ProcessRunner::new(Duration::from_secs(config.alert.timeout_secs)));

    Poller::new(config, probe_runner, alert_runner)
}

/// Install the Prometheus exporter if an address is configured.
pub fn start_metrics(config: &MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let Some(address) = &config.observability.metrics_address else {
        return Ok(());
    };

    let addr: SocketAddr = address.parse().map_err(|_| {
        ConfigError::Validation(vec![ValidationError {
            field: "observability.metrics_address",
            message: format!("'{}' is not a socket address", address),
        }])
    })?;
    metrics::init_metrics(addr)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_poller_requires_directory() {
        assert!(build_poller(&MonitorConfig::default()).is_err());

        let mut config = MonitorConfig::default();
        config.monitor.directory = Some(PathBuf::from("/service"));
        let poller = build_poller(&config).unwrap();
        assert_eq!(poller.directory(), PathBuf::from("/service").as_path());
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        assert!(start_metrics(&MonitorConfig::default()).is_ok());
    }
}
