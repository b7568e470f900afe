//! Configuration Loading for LocalSite Core.
//!
//! [`ConfigLoader`] locates up to two TOML files (a system-wide one and a user
//! one), deep-merges them, deserializes the result into [`CoreConfig`] and
//! validates it.
//!
//! # Usage
//!
//! ```rust
//! use localsite_core::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_from_str(r#"
//!     [logging]
//!     level = "DEBUG"
//! "#).unwrap();
//! assert_eq!(config.logging.level, "debug");
//! ```
//!
//! ## Validation
//!
//! - Log levels are lower-cased and must be one of trace/debug/info/warn/error.
//! - Log formats are lower-cased and must be "text" or "json".
//! - Theming defaults and naming settings must not be blank.

use std::fs;
use std::path::Path;
use toml::{Table, Value};

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// `ConfigLoader` provides static methods to load and validate `CoreConfig`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration from an optional system file and an optional user file.
    ///
    /// Values from `user_path` override values from `system_path`, table by table.
    /// A path that does not exist (or an empty file) contributes nothing; when neither
    /// contributes, the default configuration is validated and returned.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] if a file exists but cannot be read.
    /// - [`ConfigError::ParseError`] if a file is not valid TOML or does not match the schema.
    /// - [`ConfigError::ValidationError`] if a value is out of range.
    pub fn load_from_paths(
        system_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<CoreConfig, CoreError> {
        let system_table = system_path.map(Self::read_table).transpose()?.flatten();
        let user_table = user_path.map(Self::read_table).transpose()?.flatten();

        let mut config = match Self::merge_toml_values(system_table, user_table) {
            Some(table) => Value::Table(table)
                .try_into::<CoreConfig>()
                .map_err(ConfigError::ParseError)?,
            None => CoreConfig::default(),
        };

        Self::validate_config(&mut config)?;
        tracing::debug!(
            level = %config.logging.level,
            format = %config.logging.format,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Reads a TOML file into a table. `Ok(None)` when the file is missing or blank.
    fn read_table(path: &Path) -> Result<Option<Table>, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => {
                let table = toml::from_str::<Table>(&content).map_err(ConfigError::ParseError)?;
                Ok(Some(table))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!(path = %path.display(), "Configuration file not present");
                Ok(None)
            }
            Err(e) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
            .into()),
        }
    }

    /// Merges two optional tables. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Table>, override_val: Option<Table>) -> Option<Table> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(mut b), Some(o)) => {
                Self::merge_toml_tables(&mut b, &o);
                Some(b)
            }
        }
    }

    /// Recursively merges `override_table` into `base_table`.
    fn merge_toml_tables(base_table: &mut Table, override_table: &Table) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(base_item) => {
                    if let (Value::Table(bt), Value::Table(ot)) = (&mut *base_item, override_item) {
                        Self::merge_toml_tables(bt, ot);
                    } else {
                        *base_item = override_item.clone();
                    }
                }
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    /// Normalizes and validates a loaded configuration in place.
    fn validate_config(config: &mut CoreConfig) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Expected one of: {}",
                config.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }
        config.logging.level = level;

        let format = config.logging.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log format '{}'. Expected one of: {}",
                config.logging.format,
                VALID_LOG_FORMATS.join(", ")
            )));
        }
        config.logging.format = format;

        let theming = &config.theming;
        let required = [
            ("default_primary_color", &theming.default_primary_color),
            ("default_secondary_color", &theming.default_secondary_color),
            ("default_text_color", &theming.default_text_color),
            ("default_background_color", &theming.default_background_color),
            ("default_font_family", &theming.default_font_family),
            ("scope_attribute", &theming.scope_attribute),
            ("style_element_prefix", &theming.style_element_prefix),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "theming.{} must not be empty",
                    name
                )));
            }
        }
        if theming.scope_attribute.chars().any(|c| c.is_whitespace() || c == '"' || c == '=') {
            return Err(ConfigError::ValidationError(format!(
                "theming.scope_attribute '{}' is not a valid attribute name",
                theming.scope_attribute
            )));
        }
        Ok(())
    }
}
