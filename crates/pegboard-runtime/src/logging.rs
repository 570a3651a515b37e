//! Tracing subscriber bootstrap.
//!
//! Libraries in this workspace only emit `tracing` events; binaries and tests
//! call [`init_logging`] once to see them. The filter is read from
//! `PEGBOARD_LOG` (same syntax as `RUST_LOG`) and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PEGBOARD_LOG";

/// Default filter when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Build the filter from [`LOG_ENV`], falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
