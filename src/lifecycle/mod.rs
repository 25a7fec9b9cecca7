//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Start metrics → Build poller
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Poller stops at its next sleep boundary → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then logging, then the poll loop
//! - No in-flight work survives shutdown; state is memory-only

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
