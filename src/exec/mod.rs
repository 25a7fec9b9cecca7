//! External command execution.
//!
//! # Data Flow
//! ```text
//! Status prober / alert notifier
//!     → CommandRunner::run(program, args)
//!     → ProcessRunner spawns the child with a deadline
//!     → CommandOutput { exit_code, stdout, stderr }
//! ```
//!
//! # Design Decisions
//! - Every collaborator process goes through one trait so tests can swap in doubles
//! - Every external call has a deadline; a child past its deadline is killed
//! - A non-zero exit is data, not an error: callers decide what it means

pub mod runner;

pub use runner::{CommandOutput, CommandRunner, ExecError, ProcessRunner};
