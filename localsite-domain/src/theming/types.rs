//! Defines the core data structures used throughout the LocalSite theming system.
//!
//! This module contains the theme identifier, the dynamic token tree every
//! resolution path produces, the stored theme document, the business binding
//! the resolver reads, and the resolved result handed to the CSS generator.

use localsite_core::config::ThemingSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::shared_types::TenantId;
use crate::theming::errors::ThemingError;
use crate::theming::validation::validate_tokens;

/// Top-level key holding tenant-authored CSS inside a token tree.
pub const CUSTOM_CSS_KEY: &str = "customCss";

// --- ThemeIdentifier ---
/// A unique identifier for a stored theme (e.g., "preset-classic", "k17f3b2c9").
/// Theme identifiers must consist of ASCII alphanumeric characters, hyphens (-) or underscores (_).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ThemeIdentifier(String);

impl ThemeIdentifier {
    /// Creates a new `ThemeIdentifier`.
    /// Panics in debug mode if the ID string is empty or contains invalid characters.
    pub fn new(id: impl Into<String>) -> Self {
        let id_str = id.into();
        debug_assert!(
            Self::is_valid(&id_str),
            "ThemeIdentifier: '{}' contains invalid characters or is empty",
            id_str
        );
        Self(id_str)
    }

    /// Validating constructor for ids coming from untrusted input (theme files).
    pub fn parse(id: &str) -> Result<Self, ThemingError> {
        if Self::is_valid(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(ThemingError::InvalidIdentifier {
                value: id.to_string(),
                reason: "expected a non-empty ASCII alphanumeric string; '-' and '_' are allowed"
                    .to_string(),
            })
        }
    }

    pub fn is_valid(id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThemeIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ThemeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- ThemeTokens ---
/// A partially populated tree of design tokens.
///
/// Known sections are `colors` (`light` / `dark` palettes), `typography`,
/// `spacing`, `effects` and `customCss`, but every level may be missing and
/// unknown keys are kept. The tree stays dynamic so that an override of an
/// unexpected shape is stored exactly as given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeTokens(Map<String, Value>);

impl ThemeTokens {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value. Only objects form a token tree.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up the value stored at `path`, e.g. `["colors", "light", "primary"]`.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Like [`get`](Self::get) but only yields non-empty strings.
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Stores `value` at `path`, creating intermediate objects.
    ///
    /// A non-object found on the way is replaced by an object. An empty path is a no-op.
    pub fn set(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for key in parents {
            let slot = current
                .entry(*key)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot.as_object_mut() {
                Some(map) => map,
                None => return,
            };
        }
        current.insert((*last).to_string(), value.into());
    }

    /// Tenant-authored CSS, if any.
    pub fn custom_css(&self) -> Option<&str> {
        self.get_str(&[CUSTOM_CSS_KEY])
    }
}

impl From<Map<String, Value>> for ThemeTokens {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// --- ThemeDocument ---
/// Whether a stored theme is a shared preset or a tenant-private custom theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeKind {
    Preset,
    #[default]
    Custom,
}

/// A stored theme: either a shared preset or a tenant's custom theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDocument {
    pub id: ThemeIdentifier,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: ThemeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_business_id: Option<TenantId>,
    #[serde(default)]
    pub tokens: ThemeTokens,
}

impl ThemeDocument {
    /// Parses a theme file and validates its id and tokens.
    ///
    /// `source_name` is only used for error messages (a file name, "upload", ...).
    pub fn from_json_str(source_name: &str, json: &str) -> Result<Self, ThemingError> {
        let document: ThemeDocument =
            serde_json::from_str(json).map_err(|e| ThemingError::ThemeFileParseError {
                source_name: source_name.to_string(),
                source_error: e,
            })?;
        // Serde bypasses the identifier check, so redo it here.
        ThemeIdentifier::parse(document.id.as_str())?;
        validate_tokens(&document.tokens)?;
        Ok(document)
    }
}

// --- BusinessThemeBinding ---
/// Legacy inline theme fields carried on older business records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyThemeFields {
    /// JSON text tagged `"simple-v1"` or `"modern-v1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// The theme-related slice of a business record.
///
/// At most one mode applies, checked in this order: a `themeId` reference
/// (plus optional `themeOverrides`), a legacy `theme.colorScheme`, and finally
/// the loose legacy color/font fields or built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessThemeBinding {
    #[serde(alias = "_id")]
    pub id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<ThemeIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_overrides: Option<ThemeTokens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<LegacyThemeFields>,
}

impl BusinessThemeBinding {
    pub fn new(id: impl Into<TenantId>) -> Self {
        Self {
            id: id.into(),
            theme_id: None,
            theme_overrides: None,
            theme: None,
        }
    }

    pub fn with_theme_id(mut self, theme_id: ThemeIdentifier) -> Self {
        self.theme_id = Some(theme_id);
        self
    }

    pub fn with_overrides(mut self, overrides: ThemeTokens) -> Self {
        self.theme_overrides = Some(overrides);
        self
    }

    pub fn with_legacy_theme(mut self, theme: LegacyThemeFields) -> Self {
        self.theme = Some(theme);
        self
    }
}

// --- ResolvedTheme ---
/// Which resolution tier produced a [`ResolvedTheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeSourceKind {
    Advanced,
    LegacyModern,
    LegacySimple,
    Default,
}

impl ThemeSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSourceKind::Advanced => "advanced",
            ThemeSourceKind::LegacyModern => "legacy-modern",
            ThemeSourceKind::LegacySimple => "legacy-simple",
            ThemeSourceKind::Default => "default",
        }
    }
}

impl fmt::Display for ThemeSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The normalized token tree for one tenant, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    pub tokens: ThemeTokens,
    pub source_kind: ThemeSourceKind,
}

// --- ThemeDefaults ---
/// Fallback values for the default resolution tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDefaults {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub background_color: String,
    pub font_family: String,
}

impl From<&ThemingSettings> for ThemeDefaults {
    fn from(settings: &ThemingSettings) -> Self {
        Self {
            primary_color: settings.default_primary_color.clone(),
            secondary_color: settings.default_secondary_color.clone(),
            text_color: settings.default_text_color.clone(),
            background_color: settings.default_background_color.clone(),
            font_family: settings.default_font_family.clone(),
        }
    }
}

impl Default for ThemeDefaults {
    fn default() -> Self {
        Self::from(&ThemingSettings::default())
    }
}
