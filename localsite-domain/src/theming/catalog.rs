//! In-memory store of theme documents.
//!
//! Holds the built-in presets (embedded at compile time from
//! `default_themes/*.theme.json`) and tenant custom themes imported from JSON.
//! Documents are shared as `Arc<ThemeDocument>`; updating a theme swaps in a
//! new `Arc`, so a document handed out earlier never changes underneath its holder.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shared_types::TenantId;
use crate::theming::errors::ThemingError;
use crate::theming::types::{ThemeDocument, ThemeIdentifier, ThemeKind, ThemeTokens};
use crate::theming::validation::validate_tokens;

const BUILTIN_PRESETS: [(&str, &str); 3] = [
    ("classic.theme.json", include_str!("default_themes/classic.theme.json")),
    ("modern.theme.json", include_str!("default_themes/modern.theme.json")),
    ("warm.theme.json", include_str!("default_themes/warm.theme.json")),
];

#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: BTreeMap<ThemeIdentifier, Arc<ThemeDocument>>,
}

impl ThemeCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-loaded with the presets shipped in this crate.
    pub fn with_builtin_presets() -> Result<Self, ThemingError> {
        let mut catalog = Self::new();
        for (file_name, json) in BUILTIN_PRESETS {
            let mut document = ThemeDocument::from_json_str(file_name, json)?;
            document.kind = ThemeKind::Preset;
            document.owner_business_id = None;
            catalog.insert(document)?;
        }
        tracing::debug!(count = catalog.len(), "Loaded built-in theme presets");
        Ok(catalog)
    }

    /// Adds a new document after validating its tokens.
    pub fn insert(&mut self, document: ThemeDocument) -> Result<Arc<ThemeDocument>, ThemingError> {
        if self.themes.contains_key(&document.id) {
            return Err(ThemingError::ThemeAlreadyExists {
                theme_id: document.id,
            });
        }
        validate_tokens(&document.tokens)?;
        let document = Arc::new(document);
        self.themes.insert(document.id.clone(), Arc::clone(&document));
        Ok(document)
    }

    /// Parses a theme file and stores it as a custom theme owned by `owner`.
    ///
    /// Whatever `kind` and owner the file claims are overridden.
    pub fn import_custom_theme(
        &mut self,
        source_name: &str,
        json: &str,
        owner: &TenantId,
    ) -> Result<Arc<ThemeDocument>, ThemingError> {
        let mut document = ThemeDocument::from_json_str(source_name, json)?;
        document.kind = ThemeKind::Custom;
        document.owner_business_id = Some(owner.clone());
        let document = self.insert(document)?;
        tracing::info!(theme_id = %document.id, owner = %owner, "Imported custom theme");
        Ok(document)
    }

    /// Replaces the tokens of an existing theme.
    pub fn update_tokens(
        &mut self,
        theme_id: &ThemeIdentifier,
        tokens: ThemeTokens,
    ) -> Result<Arc<ThemeDocument>, ThemingError> {
        validate_tokens(&tokens)?;
        let slot = self
            .themes
            .get_mut(theme_id)
            .ok_or_else(|| ThemingError::ThemeNotFound {
                theme_id: theme_id.clone(),
            })?;
        let updated = Arc::new(ThemeDocument {
            tokens,
            ..ThemeDocument::clone(slot)
        });
        *slot = Arc::clone(&updated);
        tracing::debug!(theme_id = %theme_id, "Updated theme tokens");
        Ok(updated)
    }

    pub fn remove(&mut self, theme_id: &ThemeIdentifier) -> Option<Arc<ThemeDocument>> {
        self.themes.remove(theme_id)
    }

    pub fn get(&self, theme_id: &ThemeIdentifier) -> Option<Arc<ThemeDocument>> {
        self.themes.get(theme_id).cloned()
    }

    pub fn presets(&self) -> impl Iterator<Item = &Arc<ThemeDocument>> + '_ {
        self.themes.values().filter(|doc| doc.kind == ThemeKind::Preset)
    }

    pub fn custom_themes_for<'a>(&'a self, owner: &'a TenantId) -> impl Iterator<Item = &'a Arc<ThemeDocument>> + 'a {
        self.themes
            .values()
            .filter(move |doc| doc.kind == ThemeKind::Custom && doc.owner_business_id.as_ref() == Some(owner))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const CUSTOM_JSON: &str = r##"{
        "id": "custom-joes",
        "name": "Joe's",
        "kind": "preset",
        "ownerBusinessId": "someone-else",
        "tokens": { "colors": { "light": { "primary": "#ff0000" } } }
    }"##;

    #[test]
    fn builtin_presets_load_and_validate() {
        let catalog = ThemeCatalog::with_builtin_presets().unwrap();
        let ids: Vec<&str> = catalog.presets().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["preset-classic", "preset-modern", "preset-warm"]);
        for doc in catalog.presets() {
            assert!(doc.tokens.get_str(&["colors", "light", "primary"]).is_some(), "{} has no primary", doc.id);
            assert_eq!(doc.owner_business_id, None);
        }
    }

    #[test]
    fn import_forces_custom_kind_and_owner() {
        let mut catalog = ThemeCatalog::new();
        let owner = TenantId::new("biz1");
        let doc = catalog.import_custom_theme("joes.theme.json", CUSTOM_JSON, &owner).unwrap();
        assert_eq!(doc.kind, ThemeKind::Custom);
        assert_eq!(doc.owner_business_id, Some(owner.clone()));
        assert_eq!(catalog.custom_themes_for(&owner).count(), 1);
        assert_eq!(catalog.custom_themes_for(&TenantId::new("biz2")).count(), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = ThemeCatalog::new();
        let owner = TenantId::new("biz1");
        catalog.import_custom_theme("a", CUSTOM_JSON, &owner).unwrap();
        let err = catalog.import_custom_theme("b", CUSTOM_JSON, &owner).unwrap_err();
        assert!(matches!(err, ThemingError::ThemeAlreadyExists { .. }));
    }

    #[test]
    fn invalid_import_is_rejected() {
        let mut catalog = ThemeCatalog::new();
        let json = r#"{ "id": "bad", "name": "Bad", "tokens": { "colors": { "light": { "primary": "" } } } }"#;
        let err = catalog.import_custom_theme("bad.json", json, &TenantId::new("biz1")).unwrap_err();
        assert!(matches!(err, ThemingError::InvalidTokenValue { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn update_swaps_document_and_keeps_old_snapshot() {
        let mut catalog = ThemeCatalog::with_builtin_presets().unwrap();
        let id = ThemeIdentifier::new("preset-warm");
        let before = catalog.get(&id).unwrap();

        let new_tokens = ThemeTokens::from_value(json!({ "colors": { "light": { "primary": "#000000" } } })).unwrap();
        let after = catalog.update_tokens(&id, new_tokens).unwrap();

        assert_eq!(after.tokens.get_str(&["colors", "light", "primary"]), Some("#000000"));
        assert_eq!(after.name, before.name);
        assert_eq!(before.tokens.get_str(&["colors", "light", "primary"]), Some("#c2410c"));
        assert!(Arc::ptr_eq(&catalog.get(&id).unwrap(), &after));
    }

    #[test]
    fn update_unknown_theme_is_not_found() {
        let mut catalog = ThemeCatalog::new();
        let err = catalog
            .update_tokens(&ThemeIdentifier::new("missing"), ThemeTokens::new())
            .unwrap_err();
        assert!(matches!(err, ThemingError::ThemeNotFound { .. }));
    }

    #[test]
    fn update_with_invalid_tokens_leaves_document_alone() {
        let mut catalog = ThemeCatalog::with_builtin_presets().unwrap();
        let id = ThemeIdentifier::new("preset-classic");
        let bad = ThemeTokens::from_value(json!({ "customCss": 5 })).unwrap();
        assert!(catalog.update_tokens(&id, bad).is_err());
        assert!(catalog.get(&id).unwrap().tokens.get(&["customCss"]).is_none());
    }

    #[test]
    fn remove_returns_document() {
        let mut catalog = ThemeCatalog::with_builtin_presets().unwrap();
        let id = ThemeIdentifier::new("preset-modern");
        assert!(catalog.remove(&id).is_some());
        assert!(catalog.get(&id).is_none());
        assert_eq!(catalog.len(), 2);
    }
}
