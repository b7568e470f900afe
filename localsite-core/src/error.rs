//! Error handling for the LocalSite core layer.
//!
//! This module defines the error types shared by everything built on top of
//! `localsite-core`, using the `thiserror` crate for ergonomic definitions.
//!
//! The main error type is [`CoreError`], which wraps the more specific
//! [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust
//! use localsite_core::error::{CoreError, ConfigError};
//!
//! fn check_level(level: &str) -> Result<(), CoreError> {
//!     if level.is_empty() {
//!         return Err(ConfigError::ValidationError("empty log level".to_string()).into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_level("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for LocalSite.
///
/// Higher layers usually wrap this type (see `ThemingError::Core` in the
/// domain crate) instead of defining their own I/O or configuration variants.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while installing the global `tracing` subscriber.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed, but one of its values is not acceptable.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Error type for logging initialization.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The global subscriber could not be installed, or the level/format is invalid.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),
}
