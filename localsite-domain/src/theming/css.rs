//! Turns a resolved token tree into CSS scoped to one tenant.
//!
//! Every populated leaf becomes a custom property on the scope selector.
//! Names follow a fixed convention per section:
//!
//! | token path                          | custom property          |
//! |-------------------------------------|--------------------------|
//! | `colors.light.primaryForeground`    | `--primary-foreground`   |
//! | `colors.dark.primary`               | `--primary` (dark block) |
//! | `typography.fontFamilyBase`         | `--font-family`          |
//! | `typography.fontSize.xl`            | `--font-size-xl`         |
//! | `spacing.4`                         | `--spacing-4`            |
//! | `spacing.container.lg`              | `--container-lg`         |
//! | `effects.borderRadius.DEFAULT`      | `--radius`               |
//! | `effects.boxShadow.md`              | `--shadow-md`            |
//! | anything else, e.g. `brand.logo.width` | `--brand-logo-width`  |

use serde_json::Value;

use crate::theming::custom_css::scope_custom_css;
use crate::theming::types::{ThemeTokens, CUSTOM_CSS_KEY};

/// Attribute a page sets to switch a tenant subtree to its dark palette.
pub const DARK_SCHEME_ATTRIBUTE: &str = "data-color-scheme";

/// Scale step that maps to the bare prefix (`--radius` rather than `--radius-DEFAULT`).
const DEFAULT_STEP: &str = "DEFAULT";

/// One custom property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssVariable {
    pub name: String,
    pub value: String,
}

/// Custom properties derived from a token tree, split by palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenDeclarations {
    /// Light palette and every non-color section.
    pub base: Vec<CssVariable>,
    /// `colors.dark` only.
    pub dark: Vec<CssVariable>,
}

/// Generates the complete stylesheet for one tenant.
///
/// Layout, in order:
/// 1. `<scope> { ... }` with every token variable, followed by declarations
///    hoisted from `:root` blocks in `customCss`.
/// 2. `<scope>[data-color-scheme="dark"] { ... }` when a dark palette exists.
/// 3. `<scope> * { font-family: var(--font-family); }` when a base font is set.
/// 4. The scoped `customCss` rules.
///
/// Output depends only on the inputs.
pub fn generate_scoped_css(scope_selector: &str, tokens: &ThemeTokens) -> String {
    let declarations = collect_token_declarations(tokens);
    let custom = tokens
        .custom_css()
        .map(|css| scope_custom_css(scope_selector, css))
        .unwrap_or_default();

    let mut css = String::new();

    let mut base_lines: Vec<String> = declarations.base.iter().map(CssVariable::to_declaration).collect();
    base_lines.extend(custom.hoisted_declarations);
    push_block(&mut css, scope_selector, &base_lines);

    if !declarations.dark.is_empty() {
        let dark_selector = format!("{}[{}=\"dark\"]", scope_selector, DARK_SCHEME_ATTRIBUTE);
        let dark_lines: Vec<String> = declarations.dark.iter().map(CssVariable::to_declaration).collect();
        push_block(&mut css, &dark_selector, &dark_lines);
    }

    let has_base_font = tokens
        .get(&["typography", "fontFamilyBase"])
        .and_then(render_value)
        .is_some();
    if has_base_font {
        push_block(
            &mut css,
            &format!("{} *", scope_selector),
            &["font-family: var(--font-family)".to_string()],
        );
    }

    css.push_str(&custom.rules);

    // Keep the text inert inside a <style> element.
    css.replace("</", "<\\/")
}

/// Collects the custom properties for every renderable leaf of `tokens`.
pub fn collect_token_declarations(tokens: &ThemeTokens) -> TokenDeclarations {
    let mut declarations = TokenDeclarations::default();
    let mut path = Vec::new();
    for (key, value) in tokens.as_map() {
        if key == CUSTOM_CSS_KEY {
            continue;
        }
        path.push(key.as_str());
        collect_leaves(value, &mut path, &mut declarations);
        path.pop();
    }
    declarations
}

fn collect_leaves<'a>(value: &'a Value, path: &mut Vec<&'a str>, declarations: &mut TokenDeclarations) {
    if let Value::Object(map) = value {
        for (key, child) in map {
            path.push(key.as_str());
            collect_leaves(child, path, declarations);
            path.pop();
        }
        return;
    }

    let Some(rendered) = render_value(value) else {
        return;
    };
    if rendered.contains(|c: char| matches!(c, '{' | '}' | ';')) {
        tracing::warn!(path = %path.join("."), "Skipping token value that would break out of its declaration");
        return;
    }

    let variable = CssVariable {
        name: variable_name(path),
        value: rendered,
    };
    if path.starts_with(&["colors", "dark"]) {
        declarations.dark.push(variable);
    } else {
        declarations.base.push(variable);
    }
}

/// Renders a leaf: strings verbatim (blank ones skipped), numbers as written,
/// booleans as `true`/`false`, arrays of scalars joined with `", "`. Objects
/// and `null` produce nothing.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|item| !item.is_array())
                .filter_map(render_value)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
    }
}

/// Maps a token path to its custom property name.
pub fn variable_name(path: &[&str]) -> String {
    let segments: Vec<String> = match path {
        ["colors", "light" | "dark", rest @ ..] if !rest.is_empty() => {
            rest.iter().map(|s| kebab_case(s)).collect()
        }
        ["typography", "fontFamilyBase"] => vec!["font-family".to_string()],
        ["typography", "fontFamilyHeading"] => vec!["font-family-heading".to_string()],
        ["typography", "fontFamilyMono"] => vec!["font-family-mono".to_string()],
        ["typography", group, rest @ ..] => scale(typography_prefix(group), rest),
        ["spacing", group @ ("container" | "section"), rest @ ..] if !rest.is_empty() => {
            scale(group.to_string(), rest)
        }
        ["spacing", rest @ ..] => scale("spacing".to_string(), rest),
        ["effects", group, rest @ ..] => scale(effects_prefix(group), rest),
        _ => path.iter().map(|s| kebab_case(s)).collect(),
    };
    format!("--{}", sanitize_identifier(&segments.join("-")))
}

fn scale(prefix: String, steps: &[&str]) -> Vec<String> {
    std::iter::once(prefix)
        .chain(
            steps
                .iter()
                .filter(|step| **step != DEFAULT_STEP)
                .map(|step| kebab_case(step)),
        )
        .collect()
}

fn typography_prefix(group: &str) -> String {
    match group {
        "fontSize" => "font-size".to_string(),
        "fontWeight" => "font-weight".to_string(),
        "lineHeight" => "line-height".to_string(),
        "letterSpacing" => "letter-spacing".to_string(),
        other => kebab_case(other),
    }
}

fn effects_prefix(group: &str) -> String {
    match group {
        "borderRadius" => "radius".to_string(),
        "boxShadow" => "shadow".to_string(),
        "transition" => "transition".to_string(),
        "animation" => "animation".to_string(),
        other => kebab_case(other),
    }
}

/// `primaryForeground` -> `primary-foreground`, `DEFAULT` -> `default`.
fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut previous: Option<char> = None;
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if previous.map_or(false, |p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == ' ' || c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

/// Replaces characters that may not appear unescaped in a custom property name.
fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || (!c.is_ascii() && c.is_alphanumeric()) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn push_block(css: &mut String, selector: &str, declarations: &[String]) {
    css.push_str(selector);
    css.push_str(" {\n");
    for declaration in declarations {
        css.push_str("  ");
        css.push_str(declaration);
        css.push_str(";\n");
    }
    css.push_str("}\n");
}

impl CssVariable {
    fn to_declaration(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const SCOPE: &str = r#"[data-theme-scope="biz1"]"#;

    fn tokens(value: Value) -> ThemeTokens {
        ThemeTokens::from_value(value).unwrap()
    }

    #[rstest]
    #[case(&["colors", "light", "primary"], "--primary")]
    #[case(&["colors", "light", "primaryForeground"], "--primary-foreground")]
    #[case(&["colors", "dark", "mutedForeground"], "--muted-foreground")]
    #[case(&["typography", "fontFamilyBase"], "--font-family")]
    #[case(&["typography", "fontFamilyHeading"], "--font-family-heading")]
    #[case(&["typography", "fontFamilyMono"], "--font-family-mono")]
    #[case(&["typography", "fontSize", "2xl"], "--font-size-2xl")]
    #[case(&["typography", "fontWeight", "semibold"], "--font-weight-semibold")]
    #[case(&["typography", "lineHeight", "tight"], "--line-height-tight")]
    #[case(&["typography", "letterSpacing", "wide"], "--letter-spacing-wide")]
    #[case(&["spacing", "4"], "--spacing-4")]
    #[case(&["spacing", "0.5"], "--spacing-0_5")]
    #[case(&["spacing", "container", "lg"], "--container-lg")]
    #[case(&["spacing", "section", "padding"], "--section-padding")]
    #[case(&["effects", "borderRadius", "DEFAULT"], "--radius")]
    #[case(&["effects", "borderRadius", "lg"], "--radius-lg")]
    #[case(&["effects", "boxShadow", "md"], "--shadow-md")]
    #[case(&["effects", "transition", "fast"], "--transition-fast")]
    #[case(&["effects", "animation", "fadeIn"], "--animation-fade-in")]
    #[case(&["brand", "logoWidth"], "--brand-logo-width")]
    fn variable_names_follow_convention(#[case] path: &[&str], #[case] expected: &str) {
        assert_eq!(variable_name(path), expected);
    }

    #[test]
    fn single_color_produces_single_scoped_block() {
        let css = generate_scoped_css(SCOPE, &tokens(json!({ "colors": { "light": { "primary": "#ff0000" } } })));
        assert_eq!(css, "[data-theme-scope=\"biz1\"] {\n  --primary: #ff0000;\n}\n");
        assert!(!css.contains(":root"));
    }

    #[test]
    fn generation_is_deterministic() {
        let t = tokens(json!({
            "colors": { "light": { "primary": "#000", "accent": "#f0f" }, "dark": { "primary": "#fff" } },
            "typography": { "fontFamilyBase": "Inter", "fontWeight": { "bold": 700 } },
            "spacing": { "4": "1rem", "container": { "lg": "1024px" } },
            "customCss": ":root { --x: 1 } .a { color: var(--x) }"
        }));
        assert_eq!(generate_scoped_css(SCOPE, &t), generate_scoped_css(SCOPE, &t));
    }

    #[test]
    fn full_layout_orders_blocks() {
        let t = tokens(json!({
            "colors": { "light": { "primary": "#000000" }, "dark": { "primary": "#ffffff" } },
            "typography": { "fontFamilyBase": "Inter, sans-serif" },
            "customCss": ":root { --hero-height: 60vh; }\n.hero { min-height: var(--hero-height); }"
        }));
        let expected = "\
[data-theme-scope=\"biz1\"] {
  --primary: #000000;
  --font-family: Inter, sans-serif;
  --hero-height: 60vh;
}
[data-theme-scope=\"biz1\"][data-color-scheme=\"dark\"] {
  --primary: #ffffff;
}
[data-theme-scope=\"biz1\"] * {
  font-family: var(--font-family);
}
[data-theme-scope=\"biz1\"] .hero { min-height: var(--hero-height); }
";
        assert_eq!(generate_scoped_css(SCOPE, &t), expected);
    }

    #[test]
    fn leaf_values_render_by_type() {
        let t = tokens(json!({
            "typography": { "fontWeight": { "bold": 700 }, "lineHeight": { "normal": 1.5 } },
            "effects": { "boxShadow": { "lg": ["0 1px 2px #000", "0 2px 4px #111"] } },
            "flags": { "rounded": true, "missing": null, "blank": "  " }
        }));
        let declarations = collect_token_declarations(&t);
        let rendered: Vec<String> = declarations.base.iter().map(CssVariable::to_declaration).collect();
        assert_eq!(
            rendered,
            vec![
                "--shadow-lg: 0 1px 2px #000, 0 2px 4px #111",
                "--flags-rounded: true",
                "--font-weight-bold: 700",
                "--line-height-normal: 1.5",
            ]
        );
    }

    #[test]
    fn values_that_escape_the_declaration_are_skipped() {
        let t = tokens(json!({ "colors": { "light": { "primary": "red; } body { display: none" } } }));
        let css = generate_scoped_css(SCOPE, &t);
        assert_eq!(css, "[data-theme-scope=\"biz1\"] {\n}\n");
    }

    #[test]
    fn style_end_tag_in_custom_css_is_neutralized() {
        let t = tokens(json!({ "customCss": ".a { content: \"</style><script>\"; }" }));
        let css = generate_scoped_css(SCOPE, &t);
        assert!(!css.contains("</style"));
        assert!(css.contains("<\\/style>"));
    }

    #[test]
    fn wrong_typed_override_is_emitted_as_is() {
        let t = tokens(json!({ "colors": { "light": { "primary": 42 } } }));
        assert!(generate_scoped_css(SCOPE, &t).contains("--primary: 42;"));
    }

    #[test]
    fn font_rule_requires_base_font() {
        let t = tokens(json!({ "typography": { "fontFamilyHeading": "Georgia" } }));
        let css = generate_scoped_css(SCOPE, &t);
        assert!(css.contains("--font-family-heading: Georgia;"));
        assert!(!css.contains(" * {"));
    }

    #[test]
    fn empty_tokens_still_emit_scope_block() {
        assert_eq!(generate_scoped_css(SCOPE, &ThemeTokens::new()), "[data-theme-scope=\"biz1\"] {\n}\n");
    }
}
