//! # LocalSite Core Library (`localsite-core`)
//!
//! `localsite-core` is the foundational library for the LocalSite website builder
//! back end. It provides the ambient pieces every other crate relies on:
//!
//! - **Error Handling**: [`CoreError`] and its specific companions [`ConfigError`]
//!   and [`LoggingError`].
//! - **Configuration**: TOML-based loading with layered system/user files, defaults
//!   and validation ([`ConfigLoader`], [`CoreConfig`]).
//! - **Logging**: `tracing` subscriber setup ([`init_logging`], [`init_minimal_logging`]).
//! - **Core Data Types**: [`Color`] for the few places that derive colors.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use localsite_core::config::ConfigLoader;
//! use localsite_core::logging::init_logging;
//! use localsite_core::error::CoreError;
//! use std::path::Path;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load_from_paths(
//!         Some(Path::new("/etc/localsite/config.toml")),
//!         None,
//!     )?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("LocalSite core initialized");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod logging;

pub use error::{CoreError, ConfigError, LoggingError};
pub use types::{Color, ColorParseError};
pub use config::{CoreConfig, LoggingConfig, ThemingSettings, ConfigLoader};
pub use logging::{init_logging, init_minimal_logging};
