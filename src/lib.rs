//! svwatch library: flapping detection for supervised services.

// Core subsystems
pub mod config;
pub mod exec;
pub mod probe;
pub mod flapping;
pub mod alert;
pub mod monitor;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::MonitorConfig;
pub use lifecycle::Shutdown;
pub use monitor::Poller;
