use localsite_core::error::CoreError;
use thiserror::Error;

use crate::theming::types::ThemeIdentifier;

/// Errors raised by the theme *management* paths: importing, validating and
/// updating stored themes. Resolving and rendering a theme never fails.
#[derive(Error, Debug)]
pub enum ThemingError {
    #[error("Failed to parse theme file '{source_name}': {source_error}")]
    ThemeFileParseError {
        source_name: String,
        #[source]
        source_error: serde_json::Error,
    },

    #[error("Invalid token value at '{path}': {message}")]
    InvalidTokenValue { path: String, message: String },

    #[error("Theme with ID '{theme_id}' not found")]
    ThemeNotFound { theme_id: ThemeIdentifier },

    #[error("Theme with ID '{theme_id}' already exists")]
    ThemeAlreadyExists { theme_id: ThemeIdentifier },

    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("Core error in theming: {0}")]
    Core(#[from] CoreError),
}

impl ThemingError {
    pub(crate) fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        ThemingError::InvalidTokenValue {
            path: path.into(),
            message: message.into(),
        }
    }
}
