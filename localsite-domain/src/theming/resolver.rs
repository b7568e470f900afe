//! Selects the theme that applies to a business.
//!
//! Three tiers are tried in order and the first one that produces tokens wins:
//!
//! 1. **Advanced**: the business references a stored theme (`themeId`) and the
//!    caller supplied that document. Its tokens are merged with the business's
//!    `themeOverrides`.
//! 2. **Legacy**: `theme.colorScheme` holds a recognized `simple-v1` or
//!    `modern-v1` scheme.
//! 3. **Default**: built from the loose legacy `primaryColor`,
//!    `secondaryColor` and `fontFamily` fields, or from [`ThemeDefaults`].
//!
//! Resolution never fails. Anything unusable is logged and skipped.

use crate::theming::legacy::{self, LegacyColorScheme};
use crate::theming::merge::merge_themes;
use crate::theming::types::{
    BusinessThemeBinding, LegacyThemeFields, ResolvedTheme, ThemeDefaults, ThemeDocument,
    ThemeSourceKind, ThemeTokens,
};

/// Resolves the theme for `business` using the built-in defaults.
///
/// `loaded_theme` is the document the caller fetched for `business.theme_id`, if any.
pub fn resolve_theme(business: &BusinessThemeBinding, loaded_theme: Option<&ThemeDocument>) -> ResolvedTheme {
    resolve_theme_with(business, loaded_theme, &ThemeDefaults::default())
}

/// Like [`resolve_theme`], with the default tier's fallback values supplied by the caller.
pub fn resolve_theme_with(
    business: &BusinessThemeBinding,
    loaded_theme: Option<&ThemeDocument>,
    defaults: &ThemeDefaults,
) -> ResolvedTheme {
    if let Some(resolved) = resolve_advanced(business, loaded_theme) {
        return resolved;
    }

    let legacy_fields = business.theme.as_ref();
    if let Some(scheme) = legacy_fields
        .and_then(|fields| fields.color_scheme.as_deref())
        .and_then(LegacyColorScheme::parse)
    {
        tracing::trace!(business_id = %business.id, kind = %scheme.source_kind(), "Resolved legacy theme");
        return ResolvedTheme {
            tokens: scheme.to_tokens(),
            source_kind: scheme.source_kind(),
        };
    }

    ResolvedTheme {
        tokens: default_theme_tokens(legacy_fields, defaults),
        source_kind: ThemeSourceKind::Default,
    }
}

fn resolve_advanced(business: &BusinessThemeBinding, loaded_theme: Option<&ThemeDocument>) -> Option<ResolvedTheme> {
    let theme_id = business.theme_id.as_ref()?;
    let document = loaded_theme?;

    if &document.id != theme_id {
        tracing::warn!(
            business_id = %business.id,
            expected = %theme_id,
            supplied = %document.id,
            "Ignoring theme document that does not match the business's themeId"
        );
        return None;
    }

    let tokens = match &business.theme_overrides {
        Some(overrides) => merge_themes(&document.tokens, overrides),
        None => document.tokens.clone(),
    };
    Some(ResolvedTheme {
        tokens,
        source_kind: ThemeSourceKind::Advanced,
    })
}

fn default_theme_tokens(fields: Option<&LegacyThemeFields>, defaults: &ThemeDefaults) -> ThemeTokens {
    let pick = |value: Option<&String>, fallback: &str| -> String {
        value
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    let primary = pick(fields.and_then(|f| f.primary_color.as_ref()), defaults.primary_color.as_str());
    let secondary = pick(fields.and_then(|f| f.secondary_color.as_ref()), defaults.secondary_color.as_str());
    let font_family = pick(fields.and_then(|f| f.font_family.as_ref()), defaults.font_family.as_str());

    let mut tokens = ThemeTokens::new();
    legacy::set_primary(&mut tokens, Some(primary.as_str()));
    legacy::set_color(&mut tokens, "secondary", Some(secondary.as_str()));
    legacy::set_color(&mut tokens, "foreground", Some(defaults.text_color.as_str()));
    legacy::set_color(&mut tokens, "background", Some(defaults.background_color.as_str()));
    tokens.set(&["typography", "fontFamilyBase"], font_family);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theming::types::{ThemeIdentifier, ThemeKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn tokens(value: Value) -> ThemeTokens {
        ThemeTokens::from_value(value).unwrap()
    }

    fn business(value: Value) -> BusinessThemeBinding {
        serde_json::from_value(value).unwrap()
    }

    fn document(id: &str, token_tree: Value) -> ThemeDocument {
        ThemeDocument {
            id: ThemeIdentifier::new(id),
            name: "Test".to_string(),
            description: None,
            kind: ThemeKind::Preset,
            owner_business_id: None,
            tokens: tokens(token_tree),
        }
    }

    #[test]
    fn advanced_theme_merges_overrides() {
        let biz = business(json!({
            "id": "biz1",
            "themeId": "t1",
            "themeOverrides": { "colors": { "light": { "primary": "#00ff00" } } }
        }));
        let doc = document("t1", json!({ "colors": { "light": { "primary": "#000000", "secondary": "#111111" } } }));

        let resolved = resolve_theme(&biz, Some(&doc));
        assert_eq!(resolved.source_kind, ThemeSourceKind::Advanced);
        assert_eq!(
            resolved.tokens,
            tokens(json!({ "colors": { "light": { "primary": "#00ff00", "secondary": "#111111" } } }))
        );
        // The shared document is untouched.
        assert_eq!(doc.tokens.get_str(&["colors", "light", "primary"]), Some("#000000"));
    }

    #[test]
    fn advanced_theme_without_overrides_uses_document_tokens() {
        let biz = business(json!({ "id": "biz1", "themeId": "t1" }));
        let doc = document("t1", json!({ "spacing": { "4": "1rem" } }));
        let resolved = resolve_theme(&biz, Some(&doc));
        assert_eq!(resolved.source_kind, ThemeSourceKind::Advanced);
        assert_eq!(resolved.tokens, doc.tokens);
    }

    #[test]
    fn mismatched_document_falls_through() {
        let biz = business(json!({
            "id": "biz1",
            "themeId": "t1",
            "theme": { "colorScheme": "{\"version\":\"simple-v1\",\"primaryColor\":\"#ff0000\"}" }
        }));
        let doc = document("t2", json!({ "colors": { "light": { "primary": "#000000" } } }));
        let resolved = resolve_theme(&biz, Some(&doc));
        assert_eq!(resolved.source_kind, ThemeSourceKind::LegacySimple);
        assert_eq!(resolved.tokens.get_str(&["colors", "light", "primary"]), Some("#ff0000"));
    }

    #[test]
    fn theme_id_without_document_falls_through_to_default() {
        let biz = business(json!({ "id": "biz1", "themeId": "t1" }));
        assert_eq!(resolve_theme(&biz, None).source_kind, ThemeSourceKind::Default);
    }

    #[test]
    fn document_without_theme_id_is_ignored() {
        let biz = business(json!({ "id": "biz1" }));
        let doc = document("t1", json!({}));
        assert_eq!(resolve_theme(&biz, Some(&doc)).source_kind, ThemeSourceKind::Default);
    }

    #[test]
    fn modern_scheme_takes_primary_from_brand_color() {
        let biz = business(json!({
            "id": "biz1",
            "theme": { "colorScheme": "{\"version\":\"modern-v1\",\"theme\":{\"brandColor\":\"#abc123\"}}" }
        }));
        let resolved = resolve_theme(&biz, None);
        assert_eq!(resolved.source_kind, ThemeSourceKind::LegacyModern);
        assert_eq!(resolved.tokens.get_str(&["colors", "light", "primary"]), Some("#abc123"));
    }

    #[rstest]
    #[case("{not json")]
    #[case("{\"version\":\"v9\"}")]
    #[case("")]
    fn unusable_color_scheme_resolves_to_default(#[case] scheme: &str) {
        let biz = business(json!({ "id": "biz1", "theme": { "colorScheme": scheme } }));
        let resolved = resolve_theme(&biz, None);
        assert_eq!(resolved.source_kind, ThemeSourceKind::Default);
        assert_eq!(
            resolved.tokens.get_str(&["colors", "light", "primary"]),
            Some(ThemeDefaults::default().primary_color.as_str())
        );
    }

    #[test]
    fn default_tier_prefers_loose_legacy_fields() {
        let biz = business(json!({
            "id": "biz1",
            "theme": { "primaryColor": "#ff6600", "fontFamily": "Georgia, serif", "secondaryColor": " " }
        }));
        let defaults = ThemeDefaults::default();
        let resolved = resolve_theme(&biz, None);
        assert_eq!(resolved.source_kind, ThemeSourceKind::Default);
        let t = &resolved.tokens;
        assert_eq!(t.get_str(&["colors", "light", "primary"]), Some("#ff6600"));
        assert_eq!(t.get_str(&["colors", "light", "secondary"]), Some(defaults.secondary_color.as_str()));
        assert_eq!(t.get_str(&["colors", "light", "foreground"]), Some(defaults.text_color.as_str()));
        assert_eq!(t.get_str(&["colors", "light", "background"]), Some(defaults.background_color.as_str()));
        assert_eq!(t.get_str(&["typography", "fontFamilyBase"]), Some("Georgia, serif"));
    }

    #[test]
    fn resolve_theme_with_uses_supplied_defaults() {
        let defaults = ThemeDefaults {
            primary_color: "#123456".to_string(),
            font_family: "Lato".to_string(),
            ..ThemeDefaults::default()
        };
        let resolved = resolve_theme_with(&BusinessThemeBinding::new("biz1"), None, &defaults);
        assert_eq!(resolved.tokens.get_str(&["colors", "light", "primary"]), Some("#123456"));
        assert_eq!(resolved.tokens.get_str(&["typography", "fontFamilyBase"]), Some("Lato"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let biz = business(json!({
            "id": "biz1",
            "theme": { "colorScheme": "{\"version\":\"modern-v1\",\"theme\":{\"brandColor\":\"#abc123\",\"borderRadius\":\"8px\"}}" }
        }));
        assert_eq!(resolve_theme(&biz, None), resolve_theme(&biz, None));
    }
}
