//! Conversion of legacy inline color schemes into token trees.
//!
//! Older business records carry their theme as a JSON string in
//! `theme.colorScheme`, tagged with a `version`. Both known shapes are turned
//! into the same token layout the advanced themes use. The handful of utility
//! classes those sites relied on (`.btn-primary`, `.bg-primary`, ...) and the
//! old variable names (`--primary-color`, ...) are carried in `customCss`, so
//! the CSS generator never needs to know a theme was legacy.

use localsite_core::types::Color;
use serde::{Deserialize, Serialize};

use crate::theming::types::{ThemeSourceKind, ThemeTokens, CUSTOM_CSS_KEY};

/// How far a hex primary is mixed towards black for its hover shade.
const HOVER_DARKEN_AMOUNT: f32 = 0.12;

/// The flat `simple-v1` shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTheme {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub heading_font_family: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
}

/// The `theme` object embedded in a `modern-v1` scheme.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModernTheme {
    #[serde(default)]
    pub brand_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub surface_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub muted_text_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub heading_font_family: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
    #[serde(default)]
    pub section_padding: Option<String>,
}

/// A parsed `theme.colorScheme` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum LegacyColorScheme {
    #[serde(rename = "simple-v1")]
    Simple(SimpleTheme),
    #[serde(rename = "modern-v1")]
    Modern { theme: ModernTheme },
}

impl LegacyColorScheme {
    /// Parses a stored color scheme string.
    ///
    /// Returns `None` for blank input, malformed JSON and unknown versions.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(raw) {
            Ok(scheme) => Some(scheme),
            Err(e) => {
                tracing::debug!("Ignoring unusable legacy color scheme: {}", e);
                None
            }
        }
    }

    pub fn source_kind(&self) -> ThemeSourceKind {
        match self {
            LegacyColorScheme::Simple(_) => ThemeSourceKind::LegacySimple,
            LegacyColorScheme::Modern { .. } => ThemeSourceKind::LegacyModern,
        }
    }

    /// Converts the scheme into a normalized token tree.
    pub fn to_tokens(&self) -> ThemeTokens {
        match self {
            LegacyColorScheme::Simple(theme) => simple_theme_tokens(theme),
            LegacyColorScheme::Modern { theme } => modern_theme_tokens(theme),
        }
    }
}

fn simple_theme_tokens(theme: &SimpleTheme) -> ThemeTokens {
    let mut tokens = ThemeTokens::new();
    set_primary(&mut tokens, theme.primary_color.as_deref());
    set_color(&mut tokens, "secondary", theme.secondary_color.as_deref());
    set_color(&mut tokens, "accent", theme.accent_color.as_deref());
    set_color(&mut tokens, "background", theme.background_color.as_deref());
    set_color(&mut tokens, "foreground", theme.text_color.as_deref());
    set_string(&mut tokens, &["typography", "fontFamilyBase"], theme.font_family.as_deref());
    set_string(&mut tokens, &["typography", "fontFamilyHeading"], theme.heading_font_family.as_deref());
    set_string(&mut tokens, &["effects", "borderRadius", "DEFAULT"], theme.border_radius.as_deref());
    attach_legacy_css(&mut tokens);
    tokens
}

fn modern_theme_tokens(theme: &ModernTheme) -> ThemeTokens {
    let mut tokens = ThemeTokens::new();
    set_primary(&mut tokens, theme.brand_color.as_deref());
    set_color(&mut tokens, "secondary", theme.secondary_color.as_deref());
    set_color(&mut tokens, "accent", theme.accent_color.as_deref());
    set_color(&mut tokens, "background", theme.background_color.as_deref());
    set_color(&mut tokens, "card", theme.surface_color.as_deref());
    set_color(&mut tokens, "foreground", theme.text_color.as_deref());
    set_color(&mut tokens, "mutedForeground", theme.muted_text_color.as_deref());
    set_color(&mut tokens, "border", theme.border_color.as_deref());
    set_string(&mut tokens, &["typography", "fontFamilyBase"], theme.font_family.as_deref());
    set_string(&mut tokens, &["typography", "fontFamilyHeading"], theme.heading_font_family.as_deref());
    set_string(&mut tokens, &["effects", "borderRadius", "DEFAULT"], theme.border_radius.as_deref());
    set_string(&mut tokens, &["spacing", "section", "padding"], theme.section_padding.as_deref());
    attach_legacy_css(&mut tokens);
    tokens
}

/// Sets `primary` plus, when it is a hex color, a readable foreground and a hover shade.
pub(crate) fn set_primary(tokens: &mut ThemeTokens, primary: Option<&str>) {
    let Some(primary) = non_blank(primary) else {
        return;
    };
    tokens.set(&["colors", "light", "primary"], primary);
    match Color::from_hex(primary) {
        Ok(color) => {
            tokens.set(
                &["colors", "light", "primaryForeground"],
                color.contrast_foreground().to_hex(),
            );
            tokens.set(
                &["colors", "light", "primaryHover"],
                color.darken(HOVER_DARKEN_AMOUNT).to_hex(),
            );
        }
        Err(e) => tracing::trace!("Not deriving shades from primary color '{}': {}", primary, e),
    }
}

pub(crate) fn set_color(tokens: &mut ThemeTokens, slot: &str, value: Option<&str>) {
    set_string(tokens, &["colors", "light", slot], value);
}

fn set_string(tokens: &mut ThemeTokens, path: &[&str], value: Option<&str>) {
    if let Some(value) = non_blank(value) {
        tokens.set(path, value);
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the compatibility stylesheet for whatever tokens are present.
fn attach_legacy_css(tokens: &mut ThemeTokens) {
    let has = |path: &[&str]| tokens.get_str(path).is_some();
    let has_color = |slot: &str| has(&["colors", "light", slot]);

    let aliases: Vec<&str> = [
        ("primary", "--primary-color: var(--primary)"),
        ("secondary", "--secondary-color: var(--secondary)"),
        ("accent", "--accent-color: var(--accent)"),
        ("foreground", "--text-color: var(--foreground)"),
        ("background", "--bg-color: var(--background)"),
    ]
    .into_iter()
    .filter(|(slot, _)| has_color(*slot))
    .map(|(_, declaration)| declaration)
    .collect();

    let mut css = String::new();
    if !aliases.is_empty() {
        css.push_str(":root {\n");
        for declaration in &aliases {
            css.push_str("  ");
            css.push_str(declaration);
            css.push_str(";\n");
        }
        css.push_str("}\n");
    }
    if has_color("primary") {
        css.push_str(".btn-primary { background-color: var(--primary); border-color: var(--primary); }\n");
        if has_color("primaryForeground") {
            css.push_str(".btn-primary { color: var(--primary-foreground); }\n");
        }
        if has_color("primaryHover") {
            css.push_str(".btn-primary:hover { background-color: var(--primary-hover); }\n");
        }
        css.push_str(".bg-primary { background-color: var(--primary); }\n");
        css.push_str(".text-primary { color: var(--primary); }\n");
        css.push_str("a { color: var(--primary); }\n");
    }
    if has(&["spacing", "section", "padding"]) {
        css.push_str("section { padding-top: var(--section-padding); padding-bottom: var(--section-padding); }\n");
    }
    if has(&["effects", "borderRadius", "DEFAULT"]) {
        css.push_str(".btn, .card, .rounded, input, textarea { border-radius: var(--radius); }\n");
    }

    if !css.is_empty() {
        tokens.set(&[CUSTOM_CSS_KEY], css);
    }
}
