//! Tenant-scoped theming for LocalSite sites.
//!
//! A business record picks its theme in one of three ways (a stored theme
//! plus overrides, a legacy inline color scheme, or nothing at all). The
//! [`resolver`] turns whichever applies into a [`ThemeTokens`] tree, the
//! [`css`] generator turns that tree into CSS confined to the tenant's
//! `[data-theme-scope="..."]` subtree, and the [`registry`] keeps one style
//! element per tenant up to date. [`ThemingService`] wires these together.

pub mod types;
pub mod errors;
pub mod validation;
pub mod merge;
pub mod legacy;
pub mod resolver;
pub mod custom_css;
pub mod css;
pub mod scope;
pub mod catalog;
pub mod registry;
pub mod service;


// Re-exports
pub use catalog::ThemeCatalog;
pub use css::generate_scoped_css;
pub use errors::ThemingError;
pub use merge::merge_themes;
pub use registry::{StyleElement, StyleHandle, StyleRegistry};
pub use resolver::{resolve_theme, resolve_theme_with};
pub use scope::ThemeScope;
pub use service::{MountedTheme, RenderedTheme, ThemingService};
pub use types::{
    BusinessThemeBinding, LegacyThemeFields, ResolvedTheme, ThemeDefaults, ThemeDocument,
    ThemeIdentifier, ThemeKind, ThemeSourceKind, ThemeTokens,
};
