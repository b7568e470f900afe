//! Naming of a tenant's style scope: the marker attribute, the matching
//! selector and the id of the `<style>` element holding its CSS.

use localsite_core::config::ThemingSettings;

use crate::shared_types::TenantId;

/// The per-tenant names a caller needs to inject and target theme CSS.
///
/// ```
/// use localsite_domain::shared_types::TenantId;
/// use localsite_domain::theming::ThemeScope;
///
/// let scope = ThemeScope::new(&TenantId::new("biz1"));
/// assert_eq!(scope.attribute(), ("data-theme-scope", "biz1"));
/// assert_eq!(scope.selector(), r#"[data-theme-scope="biz1"]"#);
/// assert_eq!(scope.style_element_id(), "theme-isolated-biz1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeScope {
    tenant_id: TenantId,
    attribute_name: String,
    selector: String,
    style_element_id: String,
}

impl ThemeScope {
    /// Builds the scope with the default attribute name and element prefix.
    pub fn new(tenant_id: &TenantId) -> Self {
        Self::with_settings(tenant_id, &ThemingSettings::default())
    }

    pub fn with_settings(tenant_id: &TenantId, settings: &ThemingSettings) -> Self {
        let selector = format!(
            "[{}=\"{}\"]",
            settings.scope_attribute,
            escape_attribute_value(tenant_id.as_str())
        );
        Self {
            tenant_id: tenant_id.clone(),
            attribute_name: settings.scope_attribute.clone(),
            selector,
            style_element_id: format!("{}{}", settings.style_element_prefix, tenant_id),
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Attribute name and value to set on the tenant's root element.
    pub fn attribute(&self) -> (&str, &str) {
        (&self.attribute_name, self.tenant_id.as_str())
    }

    /// Attribute selector matching the tenant's root element.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn style_element_id(&self) -> &str {
        &self.style_element_id
    }
}

/// Escapes a value for use inside a double-quoted CSS attribute selector.
fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            // A raw newline would end the string token; use the hex escape.
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(c),
        }
    }
    escaped
}
