//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Route warnings and errors to stderr, everything else to stdout
//! - Configure log level from config, overridable via `RUST_LOG`

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Filter used when neither `RUST_LOG` nor the config yield a valid one.
const FALLBACK_FILTER: &str = "svwatch=info";

fn env_filter(log_level: &str) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter(from_env.as_deref(), log_level)
}

/// `RUST_LOG` wins, then the configured level, then the fallback.
fn build_filter(from_env: Option<&str>, log_level: &str) -> EnvFilter {
    from_env
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(config: &ObservabilityConfig) {
    // WARN and more severe go to stderr; INFO and below to stdout.
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let registry = tracing_subscriber::registry().with(env_filter(&config.log_level));

    match config.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(writer))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init(),
    }
}
