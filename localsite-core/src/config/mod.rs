//! Configuration Management for LocalSite Core.
//!
//! ## Key Components:
//!
//! - [`types`]: The configuration schema ([`CoreConfig`], [`LoggingConfig`],
//!   [`ThemingSettings`]).
//! - [`defaults`]: Functions returning default values, referenced from
//!   `#[serde(default = ...)]` attributes.
//! - [`loader`]: [`ConfigLoader`], which reads a system file and a user file,
//!   merges the user table over the system table, and validates the result.
//!
//! ## Configuration Loading Process:
//!
//! 1. Each configured file is read if it exists; a missing file contributes nothing.
//! 2. The TOML tables are deep-merged, user values winning.
//! 3. The merged table is deserialized into [`CoreConfig`]; with no files at all
//!    [`CoreConfig::default`] is used.
//! 4. The result is validated (log level/format, non-empty theming defaults).
//!
//! # Examples
//!
//! ```rust,no_run
//! use localsite_core::config::ConfigLoader;
//! use std::path::Path;
//!
//! match ConfigLoader::load_from_paths(Some(Path::new("/etc/localsite/config.toml")), None) {
//!     Ok(config) => println!("Loaded log level: {}", config.logging.level),
//!     Err(e) => {
//!         localsite_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod types;
pub mod loader;

pub use types::{CoreConfig, LoggingConfig, ThemingSettings};
pub use loader::ConfigLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.theming, ThemingSettings::default());
    }

    #[test]
    fn test_core_config_deserialize_minimal_json() {
        let json_data = r#"{ "logging": { "level": "debug" } }"#;
        let config: CoreConfig =
            serde_json::from_str(json_data).expect("Failed to deserialize CoreConfig");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.theming, ThemingSettings::default());
    }

    #[test]
    fn test_core_config_rejects_unknown_fields() {
        let toml_data = r##"
            [theming]
            default_primary_colour = "#000000"
        "##;
        let result: Result<CoreConfig, _> = toml::from_str(toml_data);
        assert!(result.is_err());
    }
}
