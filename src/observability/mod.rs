//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poller, prober and notifier produce:
//!     → logging.rs (structured log events; status lines on stdout, warnings on stderr)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → Supervisor log collection (stdout/stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (service, uptime, pid)
//! - JSON format available for machine parsing
//! - Metrics are cheap and do nothing unless an exporter is installed

pub mod logging;
pub mod metrics;
