//! Logging infrastructure for askrelay.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All logs go to stderr; stdout is reserved for `askrelay ask` output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// This sets up structured logging with:
/// - Output to stderr
/// - Environment-based filtering (RUST_LOG or provided level)
/// - Human-readable or JSON lines format
/// - Optional ANSI color control (text format only)
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "debug", "info")
/// * `format` - Output format
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use askrelay_core::{config::LogFormat, logging::init_logging};
///
/// init_logging(None, LogFormat::Text, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, format: LogFormat, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(!no_color && supports_color()),
            )
            .try_init(),
    };

    result.map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
