//! Flapping detection subsystem.
//!
//! # Data Flow
//! ```text
//! Per service, per tick:
//!     history.rs (uptimes before this tick)
//!     → detector.rs (flapping verdict)
//!     → latch.rs (fire alert at most once per episode)
//!     → history.rs records the new uptime if the service is up
//! ```
//!
//! # Design Decisions
//! - The verdict uses the history as it stood before the tick's observation
//! - Down observations never touch history; one transient down cannot hide flapping
//! - The latch resets on the first up-observation that is not flapping

pub mod detector;
pub mod history;
pub mod latch;

pub use detector::FlapDetector;
pub use history::UptimeHistory;
pub use latch::NotificationLatch;
