//! Shared utilities for integration tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use svwatch::config::MonitorConfig;
use svwatch::exec::{CommandOutput, CommandRunner, ExecError};
use tempfile::TempDir;

pub const SVSTAT: &str = "svstat";
pub const PAGER: &str = "page-oncall";

/// A fake supervision layer: serves scripted `svstat` output in order and
/// records every command it is asked to run.
pub struct FakeSupervisor {
    outputs: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    alert_exit_code: i32,
}

impl FakeSupervisor {
    pub fn new() -> Arc<Self> {
        Self::with_alert_exit_code(0)
    }

    pub fn with_alert_exit_code(code: i32) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            alert_exit_code: code,
        })
    }

    /// Queue the stdout of one successful status query.
    pub fn push_lines(&self, lines: &[String]) {
        let mut stdout = lines.join("\n");
        stdout.push('\n');
        self.outputs.lock().unwrap().push_back(CommandOutput {
            exit_code: Some(0),
            stdout,
            stderr: String::new(),
        });
    }

    /// Queue a failing status query.
    #[allow(dead_code)]
    pub fn push_failure(&self, exit_code: i32, stderr: &str) {
        self.outputs.lock().unwrap().push_back(CommandOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        });
    }

    /// Argument lists of every call to `program`, in order.
    pub fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == program)
            .map(|(_, args)| args.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeSupervisor {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        if program == SVSTAT {
            let scripted = self.outputs.lock().unwrap().pop_front();
            return Ok(scripted.unwrap_or(CommandOutput {
                exit_code: Some(111),
                stdout: String::new(),
                stderr: "no scripted output".to_string(),
            }));
        }

        Ok(CommandOutput {
            exit_code: Some(self.alert_exit_code),
            ..Default::default()
        })
    }
}

/// A service directory containing one sub-directory per name.
pub fn service_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::create_dir(dir.path().join(name)).unwrap();
    }
    dir
}

/// Config pointing at `dir` with the fake status and alert commands.
pub fn config_for(dir: &Path) -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.monitor.directory = Some(dir.to_path_buf());
    config.monitor.interval_secs = 1;
    config.probe.command = SVSTAT.to_string();
    config.alert.command = Some(PAGER.to_string());
    config
}

pub fn up_line(dir: &Path, name: &str, uptime: u64) -> String {
    format!("{}: up (pid {}) {} seconds", dir.join(name).display(), 4000 + uptime, uptime)
}

pub fn down_line(dir: &Path, name: &str) -> String {
    format!("{}: down 2 seconds, normally up", dir.join(name).display())
}
