//! The polling loop.
//!
//! # Responsibilities
//! - Discover services, probe them in one batch, update per-service state
//! - Fire flapping alerts through the notification latch
//! - Sleep between ticks until shutdown is signalled

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time;

use crate::alert::{Delivery, Notifier};
use crate::config::{ConfigError, MonitorConfig, ProbeFailurePolicy};
use crate::config::validation::ValidationError;
use crate::exec::CommandRunner;
use crate::flapping::FlapDetector;
use crate::monitor::state::{ServiceState, ServiceTable};
use crate::observability::metrics;
use crate::probe::{list_services, DiscoveryError, ProbeError, ServiceStatus, StatusProber};

/// Errors that abort a tick.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// What happened to one service during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub name: String,
    pub status: ServiceStatus,
    /// Verdict on the history from before this tick.
    pub flapping: bool,
    /// An alert fired for this service this tick.
    pub alerted: bool,
}

/// Summary of one completed tick, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub services: Vec<ServiceReport>,
}

impl TickReport {
    pub fn service(&self, name: &str) -> Option<&ServiceReport> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn alerts(&self) -> impl Iterator<Item = &ServiceReport> {
        self.services.iter().filter(|s| s.alerted)
    }
}

/// Single control loop owning all per-service state.
pub struct Poller {
    directory: PathBuf,
    interval: Duration,
    policy: ProbeFailurePolicy,
    prober: StatusProber,
    detector: FlapDetector,
    notifier: Notifier,
    services: ServiceTable,
}

impl Poller {
    /// Wire a poller from a validated config.
    ///
    /// `probe_runner` runs the status command, `alert_runner` the alert command.
    pub fn new(
        config: &MonitorConfig,
        probe_runner: Arc<dyn CommandRunner>,
        alert_runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, ConfigError> {
        let directory = config.monitor.directory.clone().ok_or_else(|| {
            ConfigError::Validation(vec![ValidationError {
                field: "monitor.directory",
                message: "a service directory must be specified".to_string(),
            }])
        })?;

        Ok(Self {
            prober: StatusProber::new(probe_runner, config.probe.command.clone(), directory.clone()),
            notifier: Notifier::new(alert_runner, config.alert.command.clone()),
            detector: FlapDetector::from_config(&config.flapping),
            services: ServiceTable::new(config.flapping.window),
            interval: Duration::from_secs(config.monitor.interval_secs),
            policy: config.monitor.on_probe_failure,
            directory,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// State for `name`, if the service has been seen.
    pub fn service_state(&self, name: &str) -> Option<&ServiceState> {
        self.services.get(name)
    }

    /// Run one probe-and-update cycle.
    ///
    /// On error no service state is modified.
    pub async fn tick(&mut self) -> Result<TickReport, MonitorError> {
        let names = list_services(&self.directory).await?;
        if names.is_empty() {
            tracing::debug!(directory = %self.directory.display(), "No services to probe");
            return Ok(TickReport::default());
        }

        let statuses = self.prober.probe(&names).await?;
        let mut report = TickReport {
            services: Vec::with_capacity(names.len()),
        };

        for name in names {
            let status = statuses
                .get(&name)
                .copied()
                .ok_or_else(|| ProbeError::MissingService(name.clone()))?;

            let state = self.services.get_or_insert(&name);
            let flapping = self.detector.is_flapping(state.history.current());

            let alerted = state.latch.should_notify(flapping);
            if alerted {
                metrics::record_alert(&name);
                match self.notifier.notify_flapping(&name, &state.history).await {
                    Ok(Delivery::Sent) => {
                        tracing::debug!(service = %name, "Flapping alert delivered");
                    }
                    Ok(Delivery::LoggedOnly) => {}
                    Err(e) => {
                        metrics::record_alert_failure(&name);
                        tracing::warn!(service = %name, error = %e, "Failed to deliver flapping alert");
                    }
                }
            }

            match (status.up, status.uptime_secs) {
                (true, Some(uptime)) => {
                    state.latch.observe_up(flapping);
                    tracing::info!(
                        service = %name,
                        uptime_secs = uptime,
                        pid = ?status.pid,
                        "{} has been up for {} seconds",
                        name,
                        uptime
                    );
                    state.history.record(uptime);
                    metrics::record_service_status(&name, Some(uptime));
                }
                _ => {
                    tracing::info!(service = %name, "{} is down; ignoring", name);
                    metrics::record_service_status(&name, None);
                }
            }

            report.services.push(ServiceReport {
                name,
                status,
                flapping,
                alerted,
            });
        }

        metrics::record_tick();
        Ok(report)
    }

    /// Poll until shutdown.
    ///
    /// Tick failures are logged and retried on the next tick under
    /// `ProbeFailurePolicy::Skip`; under `Exit` the first one is returned.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), MonitorError> {
        tracing::info!(
            directory = %self.directory.display(),
            interval_secs = self.interval.as_secs(),
            "Watching {}...",
            self.directory.display()
        );

        loop {
            match self.tick().await {
                Ok(report) => {
                    tracing::debug!(services = report.services.len(), "Tick complete");
                }
                Err(e) => {
                    metrics::record_probe_failure();
                    match self.policy {
                        ProbeFailurePolicy::Exit => {
                            tracing::error!(error = %e, "Tick failed; stopping");
                            return Err(e);
                        }
                        ProbeFailurePolicy::Skip => {
                            tracing::error!(error = %e, "Tick failed; retrying next interval");
                        }
                    }
                }
            }

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        Ok(())
    }
}
