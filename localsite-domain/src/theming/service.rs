//! Entry point for callers of the theming system.
//!
//! [`ThemingService`] ties the pieces together: it looks up the theme a
//! business references in the [`ThemeCatalog`], resolves and renders it, and
//! keeps the tenant's style element current through the [`StyleRegistry`].
//! The service is cheap to clone; clones share the catalog and the registry.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use localsite_core::config::{ConfigLoader, ThemingSettings};

use crate::shared_types::TenantId;
use crate::theming::catalog::ThemeCatalog;
use crate::theming::css::generate_scoped_css;
use crate::theming::errors::ThemingError;
use crate::theming::registry::{StyleHandle, StyleRegistry};
use crate::theming::resolver::resolve_theme_with;
use crate::theming::scope::ThemeScope;
use crate::theming::types::{
    BusinessThemeBinding, ResolvedTheme, ThemeDefaults, ThemeDocument, ThemeIdentifier, ThemeKind,
    ThemeSourceKind, ThemeTokens,
};

/// CSS for one tenant together with the names needed to inject it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTheme {
    pub scope: ThemeScope,
    pub css: String,
    pub source_kind: ThemeSourceKind,
}

#[derive(Debug, Clone)]
pub struct ThemingService {
    catalog: Arc<RwLock<ThemeCatalog>>,
    registry: StyleRegistry,
    settings: Arc<ThemingSettings>,
    defaults: Arc<ThemeDefaults>,
}

impl ThemingService {
    pub fn new(catalog: ThemeCatalog, settings: ThemingSettings) -> Self {
        let defaults = ThemeDefaults::from(&settings);
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            registry: StyleRegistry::new(),
            settings: Arc::new(settings),
            defaults: Arc::new(defaults),
        }
    }

    /// A service whose catalog starts with the built-in presets.
    pub fn with_builtin_presets(settings: ThemingSettings) -> Result<Self, ThemingError> {
        Ok(Self::new(ThemeCatalog::with_builtin_presets()?, settings))
    }

    /// Loads the layered configuration and builds a service from its theming settings.
    pub fn from_config_paths(system_path: Option<&Path>, user_path: Option<&Path>) -> Result<Self, ThemingError> {
        let config = ConfigLoader::load_from_paths(system_path, user_path)?;
        Self::with_builtin_presets(config.theming)
    }

    pub fn settings(&self) -> &ThemingSettings {
        &self.settings
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn scope_for(&self, tenant_id: &TenantId) -> ThemeScope {
        ThemeScope::with_settings(tenant_id, &self.settings)
    }

    pub fn theme(&self, theme_id: &ThemeIdentifier) -> Option<Arc<ThemeDocument>> {
        self.read_catalog().get(theme_id)
    }

    pub fn import_theme(
        &self,
        source_name: &str,
        json: &str,
        owner: &TenantId,
    ) -> Result<Arc<ThemeDocument>, ThemingError> {
        self.write_catalog().import_custom_theme(source_name, json, owner)
    }

    pub fn update_theme_tokens(
        &self,
        theme_id: &ThemeIdentifier,
        tokens: ThemeTokens,
    ) -> Result<Arc<ThemeDocument>, ThemingError> {
        self.write_catalog().update_tokens(theme_id, tokens)
    }

    /// Resolves the theme for `business` against the catalog.
    pub fn resolve(&self, business: &BusinessThemeBinding) -> ResolvedTheme {
        let document = self.visible_theme(business);
        resolve_theme_with(business, document.as_deref(), &self.defaults)
    }

    pub fn render(&self, business: &BusinessThemeBinding) -> RenderedTheme {
        let resolved = self.resolve(business);
        let scope = self.scope_for(&business.id);
        let css = generate_scoped_css(scope.selector(), &resolved.tokens);
        RenderedTheme {
            scope,
            css,
            source_kind: resolved.source_kind,
        }
    }

    /// Renders the theme for `business` into its style element and keeps it
    /// registered for as long as the returned [`MountedTheme`] lives.
    pub fn mount(&self, business: &BusinessThemeBinding) -> MountedTheme {
        let rendered = self.render(business);
        let handle = self.registry.acquire(&rendered.scope);
        handle.apply(&rendered.css);
        MountedTheme {
            service: self.clone(),
            handle,
            scope: rendered.scope,
            source_kind: rendered.source_kind,
        }
    }

    /// The referenced document, provided the business may use it: presets are
    /// shared, custom themes only serve their owner.
    fn visible_theme(&self, business: &BusinessThemeBinding) -> Option<Arc<ThemeDocument>> {
        let theme_id = business.theme_id.as_ref()?;
        let Some(document) = self.read_catalog().get(theme_id) else {
            tracing::debug!(business_id = %business.id, theme_id = %theme_id, "Referenced theme is not in the catalog");
            return None;
        };
        let visible = document.kind == ThemeKind::Preset
            || document.owner_business_id.as_ref() == Some(&business.id);
        if !visible {
            tracing::warn!(
                business_id = %business.id,
                theme_id = %theme_id,
                "Business references another tenant's custom theme"
            );
            return None;
        }
        Some(document)
    }

    fn read_catalog(&self) -> RwLockReadGuard<'_, ThemeCatalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_catalog(&self) -> RwLockWriteGuard<'_, ThemeCatalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A tenant theme that is currently injected into its style element.
#[derive(Debug)]
pub struct MountedTheme {
    service: ThemingService,
    handle: StyleHandle,
    scope: ThemeScope,
    source_kind: ThemeSourceKind,
}

impl MountedTheme {
    pub fn scope(&self) -> &ThemeScope {
        &self.scope
    }

    pub fn source_kind(&self) -> ThemeSourceKind {
        self.source_kind
    }

    pub fn style_element_id(&self) -> &str {
        self.handle.element_id()
    }

    pub fn css(&self) -> String {
        self.handle.css()
    }

    /// Re-renders after the business or its theme changed.
    ///
    /// Returns whether the style element's CSS changed. A record for a
    /// different tenant is ignored.
    pub fn refresh(&mut self, business: &BusinessThemeBinding) -> bool {
        if &business.id != self.scope.tenant_id() {
            tracing::warn!(
                mounted = %self.scope.tenant_id(),
                received = %business.id,
                "Ignoring refresh for a different tenant"
            );
            return false;
        }
        let rendered = self.service.render(business);
        self.source_kind = rendered.source_kind;
        self.handle.apply(&rendered.css)
    }
}
