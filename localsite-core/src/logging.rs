//! Logging setup for LocalSite.
//!
//! Built on the `tracing` ecosystem. Library code only emits events through the
//! `tracing` macros; binaries and tests pick a subscriber with one of the functions
//! below.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Initializes a minimal logging setup, directing messages to `stderr`.
///
/// Filters with `RUST_LOG`, defaulting to "info" when it is unset or invalid.
/// Errors (e.g. a global subscriber is already installed) are ignored, so this
/// may be called from every test.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Maps a configured level name onto a `tracing` level.
fn parse_level(level: &str) -> Result<Level, CoreError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        invalid_level => Err(LoggingError::InitializationFailure(format!(
            "Invalid log level in config: {}",
            invalid_level
        ))
        .into()),
    }
}

/// Initializes the global logging system from a [`LoggingConfig`].
///
/// Installs a console layer on `stdout` in the configured format ("text" or
/// "json"), filtered at the configured level.
///
/// # Arguments
///
/// * `config`: The logging configuration.
/// * `is_reload`: When `true`, an already installed subscriber is not an error;
///   the previous subscriber simply stays active.
///
/// # Errors
///
/// Returns [`LoggingError::InitializationFailure`] for an invalid level or format,
/// or when a subscriber is already installed and `is_reload` is `false`.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;
    let filter = EnvFilter::new(level.to_string());

    let stdout_layer = match config.format.to_lowercase().as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        "text" => fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(filter)
            .boxed(),
        other => {
            return Err(LoggingError::InitializationFailure(format!(
                "Invalid log format in config: {}",
                other
            ))
            .into())
        }
    };

    match Registry::default().with(stdout_layer).try_init() {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            tracing::info!("Logging re-initialization skipped, previous subscriber stays active: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
