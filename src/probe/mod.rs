//! Status probing subsystem.
//!
//! # Data Flow
//! ```text
//! Each tick:
//!     discovery.rs lists the monitored directory
//!     → svstat.rs runs one status query for all services
//!     → parsed into ServiceStatus per service
//!     → handed to the poller
//! ```
//!
//! # Design Decisions
//! - One batched query per tick, never one per service
//! - The service set is re-read every tick, never cached
//! - Output that omits a requested service fails the whole probe

pub mod discovery;
pub mod svstat;

pub use discovery::{list_services, DiscoveryError};
pub use svstat::{ProbeError, ServiceStatus, StatusProber};
