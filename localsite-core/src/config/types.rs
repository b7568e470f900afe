//! Configuration Data Structures for LocalSite Core.
//!
//! # Key Structs
//! - [`CoreConfig`]: The root configuration structure.
//! - [`LoggingConfig`]: Configuration for the logging subsystem.
//! - [`ThemingSettings`]: Fallback constants and naming used by the theme engine.
//!
//! Missing fields take their values from [`super::defaults`]. Unknown fields are
//! rejected via `#[serde(deny_unknown_fields)]`.

use serde::{Deserialize, Serialize};
use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use localsite_core::config::LoggingConfig;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.format, "text");
///
/// let toml_str = r#"
/// level = "debug"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The minimum log level to record.
    /// Valid values (case-insensitive): "trace", "debug", "info", "warn", "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Output format of the console layer: "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Settings consumed by the theme engine.
///
/// The color and font values are used by the default resolution tier when a
/// business carries no theme data at all. The attribute and prefix control the
/// naming of the per-tenant scope (`[data-theme-scope="..."]`) and style
/// element (`theme-isolated-...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemingSettings {
    #[serde(default = "defaults::default_primary_color")]
    pub default_primary_color: String,
    #[serde(default = "defaults::default_secondary_color")]
    pub default_secondary_color: String,
    #[serde(default = "defaults::default_text_color")]
    pub default_text_color: String,
    #[serde(default = "defaults::default_background_color")]
    pub default_background_color: String,
    #[serde(default = "defaults::default_font_family")]
    pub default_font_family: String,
    /// Name of the data attribute that marks a tenant's subtree.
    #[serde(default = "defaults::default_scope_attribute")]
    pub scope_attribute: String,
    /// Prefix for the id of the tenant's `<style>` element.
    #[serde(default = "defaults::default_style_element_prefix")]
    pub style_element_prefix: String,
}

impl Default for ThemingSettings {
    fn default() -> Self {
        defaults::default_theming_settings()
    }
}

/// Root configuration structure for LocalSite.
///
/// # Examples
///
/// ```
/// use localsite_core::config::CoreConfig;
///
/// let toml_str = r##"
/// [logging]
/// level = "warn"
///
/// [theming]
/// default_primary_color = "#ff6600"
/// "##;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.logging.format, "text");
/// assert_eq!(loaded.theming.default_primary_color, "#ff6600");
/// assert_eq!(loaded.theming.scope_attribute, "data-theme-scope");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_theming_settings")]
    pub theming: ThemingSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            theming: ThemingSettings::default(),
        }
    }
}
