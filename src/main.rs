//! svwatch: flapping detector for supervised services.
//!
//! # Architecture Overview
//!
//! ```text
//!   service dir ──▶ discovery ──▶ svstat prober ──▶ poller ──▶ status lines (stdout)
//!                                  (exec runner)      │
//!                                                     ├─▶ history + flap detector
//!                                                     └─▶ latch ──▶ notifier ──▶ alert command
//!
//!   cross-cutting: config · lifecycle (signals/shutdown) · observability
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use svwatch::config::{load_config, ConfigOverrides, LogFormat};
use svwatch::lifecycle::signals::spawn_signal_listener;
use svwatch::lifecycle::startup::{build_poller, start_metrics};
use svwatch::lifecycle::Shutdown;
use svwatch::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "svwatch")]
#[command(about = "Watch a daemontools service directory and alert on flapping services", long_about = None)]
struct Cli {
    /// Directory containing one sub-directory per supervised service
    directory: Option<PathBuf>,

    /// Command run as `<command> <service> <uptimes>` when a service starts flapping
    notify_command: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls
    #[arg(short, long)]
    interval: Option<u64>,

    /// Path to the svstat binary
    #[arg(long)]
    svstat: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            directory: self.directory.clone(),
            alert_command: self.notify_command.clone(),
            interval_secs: self.interval,
            probe_command: self.svstat.clone(),
            log_format: self.log_format,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    match value {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{}' (expected pretty or json)", other)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("svwatch: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config.observability);
    tracing::debug!(?config, "Configuration loaded");

    if let Err(e) = start_metrics(&config) {
        tracing::error!(error = %e, "Failed to start metrics exporter");
        return ExitCode::FAILURE;
    }

    let poller = match build_poller(&config) {
        Ok(poller) => poller,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let poller_shutdown = shutdown.subscribe();
    spawn_signal_listener(shutdown.clone());

    match poller.run(poller_shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Monitor stopped");
            ExitCode::FAILURE
        }
    }
}
