//! Domain layer for the LocalSite website builder.
//!
//! Currently this is the theming engine: resolving which theme a business
//! uses, merging tenant overrides, and generating CSS that is isolated to the
//! tenant's part of the page.

// Re-export core module
pub use localsite_core as core;

pub mod shared_types;
pub mod theming;

pub use shared_types::TenantId;
pub use theming::{
    generate_scoped_css, merge_themes, resolve_theme, resolve_theme_with, BusinessThemeBinding,
    MountedTheme, RenderedTheme, ResolvedTheme, StyleRegistry, ThemeCatalog, ThemeDocument,
    ThemeIdentifier, ThemeScope, ThemeSourceKind, ThemeTokens, ThemingError, ThemingService,
};
