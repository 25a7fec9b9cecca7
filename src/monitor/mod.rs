//! Monitoring orchestration.
//!
//! # Data Flow
//! ```text
//! Every interval:
//!     poller.rs
//!     → probe (discover + one batched svstat)
//!     → per service: verdict on old history → latch → alert
//!     → record uptime if up, log status line
//!     → sleep (interrupted by shutdown)
//! ```
//!
//! # Design Decisions
//! - Single task, no locks: the poller owns state.rs by value
//! - A failed tick leaves all state untouched
//! - Failed ticks are retried next interval unless configured to exit

pub mod poller;
pub mod state;

pub use poller::{MonitorError, Poller, ServiceReport, TickReport};
pub use state::{ServiceState, ServiceTable};
