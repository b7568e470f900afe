//! Structural checks for token trees entering the catalog.
//!
//! Only stored themes (imports and explicit updates) are validated. Tenant
//! overrides are merged unchecked, and the renderer copes with whatever shape
//! it finds.

use serde_json::{Map, Value};

use crate::theming::errors::ThemingError;
use crate::theming::types::{ThemeTokens, CUSTOM_CSS_KEY};

const OBJECT_SECTIONS: [&str; 4] = ["colors", "typography", "spacing", "effects"];
const PALETTES: [&str; 2] = ["light", "dark"];

/// Checks that a token tree has the expected shape where it has anything at all.
///
/// - `colors`, `typography`, `spacing` and `effects` must be objects.
/// - Every palette slot in `colors.light` / `colors.dark` must be a non-empty string.
/// - Every `typography.fontWeight` step must be an integer.
/// - `customCss` must be a string.
///
/// Missing sections are fine; unknown keys are ignored.
pub fn validate_tokens(tokens: &ThemeTokens) -> Result<(), ThemingError> {
    for section in OBJECT_SECTIONS {
        if let Some(value) = tokens.get(&[section]) {
            require_object(section, value)?;
        }
    }

    for palette in PALETTES {
        let Some(value) = tokens.get(&["colors", palette]) else {
            continue;
        };
        let path = format!("colors.{}", palette);
        for (slot, color) in require_object(&path, value)? {
            let is_valid = color.as_str().map_or(false, |s| !s.trim().is_empty());
            if !is_valid {
                return Err(ThemingError::invalid_value(
                    format!("{}.{}", path, slot),
                    "palette slots must be non-empty color strings",
                ));
            }
        }
    }

    if let Some(value) = tokens.get(&["typography", "fontWeight"]) {
        for (step, weight) in require_object("typography.fontWeight", value)? {
            if !(weight.is_u64() || weight.is_i64()) {
                return Err(ThemingError::invalid_value(
                    format!("typography.fontWeight.{}", step),
                    format!("font weights must be integers, got {}", weight),
                ));
            }
        }
    }

    if let Some(value) = tokens.get(&[CUSTOM_CSS_KEY]) {
        if !value.is_string() {
            return Err(ThemingError::invalid_value(CUSTOM_CSS_KEY, "custom CSS must be a string"));
        }
    }

    Ok(())
}

fn require_object<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ThemingError> {
    value
        .as_object()
        .ok_or_else(|| ThemingError::invalid_value(path, "expected an object"))
}
