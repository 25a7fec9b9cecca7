//! Batched status queries against the supervision layer.
//!
//! # Responsibilities
//! - Run one `svstat` for every service in the set
//! - Parse each output line into a `ServiceStatus`
//! - Reject output that is missing a requested service
//!
//! # Output Format
//! ```text
//! /service/web: up (pid 1234) 56 seconds
//! /service/db: down 3 seconds, normally up
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::exec::{CommandRunner, ExecError};

const PATH_SEPARATOR: &str = ": ";
const DOWN_STATE: &str = "down";
const SECONDS_UNIT: &str = "seconds";
const PID_MARKER: &str = "(pid ";

/// Status of one service as seen by a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub up: bool,
    /// Only reported for running services.
    pub pid: Option<u32>,
    /// Only reported for running services.
    pub uptime_secs: Option<u64>,
}

impl ServiceStatus {
    pub fn up(pid: Option<u32>, uptime_secs: u64) -> Self {
        Self {
            up: true,
            pid,
            uptime_secs: Some(uptime_secs),
        }
    }

    pub fn down() -> Self {
        Self {
            up: false,
            pid: None,
            uptime_secs: None,
        }
    }
}

/// Errors that fail a whole probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The status command could not be run to completion.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The status command reported failure.
    #[error("status command exited with {}: {stderr}", describe_exit(.exit_code))]
    CommandFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// A line did not have the expected shape.
    #[error("malformed status line '{line}': {reason}")]
    Malformed { line: String, reason: &'static str },

    /// A requested service was absent from the output.
    #[error("no status reported for service '{0}'")]
    MissingService(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Parse a single status line into `(service name, status)`.
///
/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<(String, ServiceStatus)>, ProbeError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let malformed = |reason| ProbeError::Malformed {
        line: line.to_string(),
        reason,
    };

    // Colons are legal inside the path; only ": " ends it.
    let (path, rest) = line
        .split_once(PATH_SEPARATOR)
        .ok_or_else(|| malformed("missing 'path: ' prefix"))?;
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    if name.is_empty() {
        return Err(malformed("empty service name"));
    }

    if rest.starts_with(DOWN_STATE) {
        return Ok(Some((name.to_string(), ServiceStatus::down())));
    }

    let uptime = parse_uptime(rest).ok_or_else(|| malformed("running service without uptime"))?;
    let pid = parse_pid(rest);

    Ok(Some((name.to_string(), ServiceStatus::up(pid, uptime))))
}

/// The integer immediately preceding the seconds unit.
fn parse_uptime(text: &str) -> Option<u64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.windows(2).find_map(|pair| {
        if pair[1].trim_end_matches(',') == SECONDS_UNIT {
            pair[0].parse().ok()
        } else {
            None
        }
    })
}

/// The integer inside `(pid N)`.
fn parse_pid(text: &str) -> Option<u32> {
    let start = text.find(PID_MARKER)? + PID_MARKER.len();
    let digits = &text[start..];
    let end = digits.find(')')?;
    digits[..end].trim().parse().ok()
}

/// Parse full `svstat` output, checking that every requested service is present.
pub fn parse_output(
    output: &str,
    requested: &[String],
) -> Result<HashMap<String, ServiceStatus>, ProbeError> {
    let mut statuses = HashMap::with_capacity(requested.len());

    for line in output.lines() {
        if let Some((name, status)) = parse_line(line)? {
            if requested.contains(&name) {
                statuses.insert(name, status);
            } else {
                tracing::debug!(service = %name, "Ignoring status for unrequested service");
            }
        }
    }

    if let Some(missing) = requested.iter().find(|name| !statuses.contains_key(*name)) {
        return Err(ProbeError::MissingService(missing.clone()));
    }

    Ok(statuses)
}

/// Issues one status query per tick for a set of services.
pub struct StatusProber {
    runner: Arc<dyn CommandRunner>,
    command: String,
    directory: PathBuf,
}

impl StatusProber {
    pub fn new(runner: Arc<dyn CommandRunner>, command: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            command: command.into(),
            directory: directory.into(),
        }
    }

    /// Query every service in one invocation.
    pub async fn probe(&self, services: &[String]) -> Result<HashMap<String, ServiceStatus>, ProbeError> {
        let args: Vec<String> = services
            .iter()
            .map(|name| self.directory.join(name).to_string_lossy().into_owned())
            .collect();

        let output = self.runner.run(&self.command, &args).await?;
        if !output.success() {
            return Err(ProbeError::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        parse_output(&output.stdout, services)
    }
}
