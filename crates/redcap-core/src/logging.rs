//! Logging setup
//!
//! The subscriber is installed for the lifetime of the returned
//! [`LoggingGuard`]; `main` holds it until the process exits. Library code
//! only uses the `tracing` macros. Log lines go to stderr so that stdout
//! carries command results.

use crate::config::{LogFormat, LoggingConfig};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the logging subscriber installed while alive
#[must_use = "logging stops when the guard is dropped"]
pub struct LoggingGuard {
    _guard: DefaultGuard,
}

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the logging subscriber described by `config`
pub fn init(config: &LoggingConfig) -> LoggingGuard {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let guard = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_default(builder.pretty().finish()),
        LogFormat::Compact => tracing::subscriber::set_default(builder.compact().finish()),
        LogFormat::Json => tracing::subscriber::set_default(builder.json().finish()),
    };

    LoggingGuard { _guard: guard }
}
