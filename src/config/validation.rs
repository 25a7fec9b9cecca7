//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0, window >= 1)
//! - Check that the monitored directory was supplied
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::MonitorConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a fully merged configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match &config.monitor.directory {
        None => errors.push(ValidationError::new(
            "monitor.directory",
            "a service directory must be specified",
        )),
        Some(dir) if dir.as_os_str().is_empty() => errors.push(ValidationError::new(
            "monitor.directory",
            "service directory must not be empty",
        )),
        Some(_) => {}
    }

    if config.monitor.interval_secs == 0 {
        errors.push(ValidationError::new("monitor.interval_secs", "must be greater than 0"));
    }

    if config.probe.command.trim().is_empty() {
        errors.push(ValidationError::new("probe.command", "must not be empty"));
    }

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::new("probe.timeout_secs", "must be greater than 0"));
    }

    if config.flapping.window == 0 {
        errors.push(ValidationError::new("flapping.window", "must be at least 1"));
    }

    if config.flapping.threshold_secs == 0 {
        errors.push(ValidationError::new("flapping.threshold_secs", "must be greater than 0"));
    }

    if let Some(command) = &config.alert.command {
        if command.trim().is_empty() {
            errors.push(ValidationError::new("alert.command", "must not be empty when set"));
        }
    }

    if config.alert.timeout_secs == 0 {
        errors.push(ValidationError::new("alert.timeout_secs", "must be greater than 0"));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "observability.metrics_address",
                format!("'{}' is not a socket address", addr),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
