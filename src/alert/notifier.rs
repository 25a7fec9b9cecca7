//! Flapping alerts.

use std::sync::Arc;

use thiserror::Error;

use crate::exec::{CommandRunner, ExecError};
use crate::flapping::UptimeHistory;

/// Delivery failures. Never fatal and never retried.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("alert command exited with {exit_code:?}: {stderr}")]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Outcome of an alert that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Only the local warning was written; no alert command is configured.
    LoggedOnly,
    /// The alert command ran and exited zero.
    Sent,
}

/// Writes the flapping warning and runs the configured alert command.
pub struct Notifier {
    runner: Arc<dyn CommandRunner>,
    command: Option<String>,
}

impl Notifier {
    pub fn new(runner: Arc<dyn CommandRunner>, command: Option<String>) -> Self {
        Self { runner, command }
    }

    /// Alert that `service` is flapping.
    ///
    /// The command receives the service name and the uptimes comma-joined,
    /// newest first.
    pub async fn notify_flapping(&self, service: &str, history: &UptimeHistory) -> Result<Delivery, NotifyError> {
        tracing::warn!(
            service = %service,
            uptimes = ?history.current(),
            "{} appears to be flapping with uptimes {}",
            service,
            history.join(", ")
        );

        let Some(command) = &self.command else {
            return Ok(Delivery::LoggedOnly);
        };

        let args = vec![service.to_string(), history.join(",")];
        let output = self.runner.run(command, &args).await?;
        if !output.success() {
            return Err(NotifyError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(Delivery::Sent)
    }
}
