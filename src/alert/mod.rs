//! Alerting subsystem.
//!
//! # Data Flow
//! ```text
//! Latch fires for a service
//!     → notifier.rs writes the flapping warning (stderr)
//!     → runs `<alert command> <service> <uptimes>` if configured
//!     → failures reported back to the poller for logging only
//! ```
//!
//! # Design Decisions
//! - At-most-once delivery: a failed alert is not retried
//! - Exit status of the alert command is only logged

pub mod notifier;

pub use notifier::{Delivery, NotifyError, Notifier};
