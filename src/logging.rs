//! Logging setup
//!
//! Human readable lines on stderr. The filter comes from `RUST_LOG`, then
//! `LOG_FILTER`, and falls back to `info`.

use anyhow::Context;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither environment variable is set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable consulted after `RUST_LOG`
pub const LOG_FILTER_ENV: &str = "LOG_FILTER";

/// Filter resolved from the environment
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_FILTER_ENV))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber
pub fn init_logging() -> anyhow::Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to set global default subscriber")?;

    Ok(())
}

/// Extension trait for logging errors on the way out
pub trait LogExt<T, E> {
    /// Log the error with the given context and pass the result through
    fn log_err(self, context: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> LogExt<T, E> for Result<T, E> {
    fn log_err(self, context: &str) -> Result<T, E> {
        if let Err(ref e) = self {
            error!("{}: {}", context, e);
        }
        self
    }
}
