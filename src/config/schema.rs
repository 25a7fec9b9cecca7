//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Polling loop settings.
    pub monitor: PollConfig,

    /// Status query settings.
    pub probe: ProbeConfig,

    /// Flapping detection thresholds.
    pub flapping: FlappingConfig,

    /// External alert settings.
    pub alert: AlertConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// What the poller does when a tick cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeFailurePolicy {
    /// Log the failure and try again on the next tick.
    #[default]
    Skip,
    /// Stop the monitor and exit with an error.
    Exit,
}

/// Polling loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Directory holding one sub-directory per supervised service.
    pub directory: Option<PathBuf>,

    /// Sleep between ticks in seconds.
    pub interval_secs: u64,

    /// Failure handling for discovery and probe errors.
    pub on_probe_failure: ProbeFailurePolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            directory: None,
            interval_secs: 10,
            on_probe_failure: ProbeFailurePolicy::Skip,
        }
    }
}

/// Status query configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Path to the status command (daemontools `svstat`).
    pub command: String,

    /// Deadline for a single status query in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: "/usr/bin/svstat".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Flapping detection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlappingConfig {
    /// Number of up-observations kept and required before judging.
    pub window: usize,

    /// Uptimes strictly below this many seconds count as short-lived.
    pub threshold_secs: u64,
}

impl Default for FlappingConfig {
    fn default() -> Self {
        Self {
            window: 5,
            threshold_secs: 60,
        }
    }
}

/// External alert configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Command invoked as `<command> <service> <uptimes>`; alerts are only
    /// logged when unset.
    pub command: Option<String>,

    /// Deadline for the alert command in seconds.
    pub timeout_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable lines or JSON records.
    pub log_format: LogFormat,

    /// Prometheus scrape address; metrics are not exported when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
