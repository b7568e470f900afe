//! Default configuration values for LocalSite Core.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures to provide values when they are not specified in the file.

use crate::config::{LoggingConfig, ThemingSettings};

/// Returns the default `LoggingConfig`.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log format string (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Returns the default `ThemingSettings`.
pub(super) fn default_theming_settings() -> ThemingSettings {
    ThemingSettings {
        default_primary_color: default_primary_color(),
        default_secondary_color: default_secondary_color(),
        default_text_color: default_text_color(),
        default_background_color: default_background_color(),
        default_font_family: default_font_family(),
        scope_attribute: default_scope_attribute(),
        style_element_prefix: default_style_element_prefix(),
    }
}

pub(super) fn default_primary_color() -> String {
    "#2563eb".to_string()
}

pub(super) fn default_secondary_color() -> String {
    "#64748b".to_string()
}

pub(super) fn default_text_color() -> String {
    "#111827".to_string()
}

pub(super) fn default_background_color() -> String {
    "#ffffff".to_string()
}

pub(super) fn default_font_family() -> String {
    "Inter, system-ui, sans-serif".to_string()
}

/// Attribute placed on the wrapping element of a tenant's subtree.
pub(super) fn default_scope_attribute() -> String {
    "data-theme-scope".to_string()
}

/// Prefix of the per-tenant `<style>` element id.
pub(super) fn default_style_element_prefix() -> String {
    "theme-isolated-".to_string()
}
