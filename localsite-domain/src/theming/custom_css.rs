//! Best-effort scoping of tenant-authored CSS.
//!
//! This is deliberately not a CSS parser. It walks the stylesheet one
//! top-level block at a time, tracking brace depth while skipping strings and
//! comments, and rewrites only the selector prelude of each block:
//!
//! - Grouping rules (`@media`, `@supports`, `@container`, `@layer`) keep their
//!   prelude; the rules inside them are scoped like top-level rules.
//! - Other `@`-rules (`@keyframes`, `@font-face`, `@import`, ...) are copied unchanged.
//! - Selectors that already start with the scope are copied unchanged.
//! - A leading `:root`, `html` or `body` chain becomes the scope selector.
//! - Every other selector is prefixed with the scope selector.
//! - A top-level block whose prelude is exactly `:root` is not emitted at all;
//!   its declarations are handed back so the caller can fold them into the
//!   scope block. Inside a grouping rule it becomes a scope-selector rule.
//!
//! Malformed input yields malformed output, never a panic.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a selector whose leading compounds target the document root,
/// e.g. `body`, `html body.dark` or `html > body .hero`.
/// Group 1 holds whatever follows the last of them (`.dark`, ` .hero`, ...).
static DOCUMENT_ROOT_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?:(?::root|html|body)(?:\s*>\s*|\s+))*(?::root|html|body)([\s.#:\[>+~].*)?$")
        .expect("document root selector pattern")
});

/// At-rules whose body is a list of rules that still need scoping.
const GROUPING_AT_RULES: [&str; 4] = ["@media", "@supports", "@container", "@layer"];

/// Grouping rules nested deeper than this are dropped instead of scoped.
const MAX_GROUPING_DEPTH: usize = 8;

/// Tenant CSS after scoping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopedCustomCss {
    /// Declarations lifted out of `:root { ... }`, trimmed, without the trailing `;`.
    pub hoisted_declarations: Vec<String>,
    /// Remaining rules, one block per line group.
    pub rules: String,
}

/// Scopes `css` to `scope_selector`.
pub fn scope_custom_css(scope_selector: &str, css: &str) -> ScopedCustomCss {
    let mut result = ScopedCustomCss::default();
    scope_rule_list(scope_selector, css, 0, &mut result);
    result
}

/// Scopes one list of rules. `depth` counts the grouping rules around it;
/// `:root` blocks are only hoisted at depth 0.
fn scope_rule_list(scope_selector: &str, css: &str, depth: usize, result: &mut ScopedCustomCss) {
    let mut pos = 0;

    while pos < css.len() {
        let trimmed = css[pos..].trim_start();
        if trimmed.is_empty() {
            break;
        }
        let start = css.len() - trimmed.len();

        if trimmed.starts_with("/*") {
            let end = trimmed[2..]
                .find("*/")
                .map_or(css.len(), |offset| start + 2 + offset + 2);
            push_line(&mut result.rules, &css[start..end]);
            pos = end;
            continue;
        }

        let Some(delimiter_at) = scan(css, start, |c| matches!(c, '{' | ';' | '}')) else {
            // Dangling text without a block.
            push_line(&mut result.rules, trimmed.trim_end());
            break;
        };

        match css.as_bytes()[delimiter_at] {
            b';' => {
                // Statement rule such as `@import url(...);`.
                push_line(&mut result.rules, css[start..=delimiter_at].trim());
                pos = delimiter_at + 1;
            }
            b'}' => {
                tracing::trace!(offset = delimiter_at, "Skipping unbalanced '}}' in custom CSS");
                pos = delimiter_at + 1;
            }
            _ => {
                let prelude = css[start..delimiter_at].trim();
                let (body, next) = match find_matching_brace(css, delimiter_at) {
                    Some(close) => (&css[delimiter_at + 1..close], close + 1),
                    None => (&css[delimiter_at + 1..], css.len()),
                };

                if is_grouping_rule(prelude) {
                    if depth >= MAX_GROUPING_DEPTH {
                        tracing::warn!(prelude = %prelude, "Dropping custom CSS grouping rule nested too deeply");
                    } else {
                        let mut inner = ScopedCustomCss::default();
                        scope_rule_list(scope_selector, body, depth + 1, &mut inner);
                        push_line(&mut result.rules, &format!("{} {{\n{}}}", prelude, inner.rules));
                    }
                } else if prelude.starts_with('@') {
                    push_line(&mut result.rules, css[start..next].trim_end());
                } else if prelude == ":root" && depth == 0 {
                    result.hoisted_declarations.extend(split_declarations(body));
                } else {
                    let selectors = scope_selector_list(scope_selector, prelude);
                    push_line(&mut result.rules, &format!("{} {{{}}}", selectors, body));
                }
                pos = next;
            }
        }
    }
}

fn is_grouping_rule(prelude: &str) -> bool {
    let name = prelude
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    GROUPING_AT_RULES
        .iter()
        .any(|rule| rule.eq_ignore_ascii_case(name))
}

/// Prefixes each selector of a comma-separated list with the scope.
pub fn scope_selector_list(scope_selector: &str, prelude: &str) -> String {
    let scoped: Vec<String> = split_selector_list(prelude)
        .into_iter()
        .filter_map(|selector| scope_selector_one(scope_selector, selector))
        .collect();
    if scoped.is_empty() {
        scope_selector.to_string()
    } else {
        scoped.join(", ")
    }
}

fn scope_selector_one(scope_selector: &str, selector: &str) -> Option<String> {
    let selector = selector.trim();
    if selector.is_empty() {
        return None;
    }
    if selector.starts_with(scope_selector) {
        return Some(selector.to_string());
    }
    if let Some(captures) = DOCUMENT_ROOT_SELECTOR.captures(selector) {
        let rest = captures.get(1).map_or("", |m| m.as_str());
        return Some(format!("{}{}", scope_selector, rest));
    }
    Some(format!("{} {}", scope_selector, selector))
}

/// Splits on commas that are not inside `(...)`, `[...]` or quotes.
fn split_selector_list(prelude: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in prelude.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&prelude[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&prelude[start..]);
    parts
}

fn split_declarations(body: &str) -> Vec<String> {
    body.split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .map(str::to_string)
        .collect()
}

/// Byte offset of the `}` closing the `{` at `open`.
fn find_matching_brace(css: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    scan(css, open, |c| match c {
        '{' => {
            depth += 1;
            false
        }
        '}' => {
            depth = depth.saturating_sub(1);
            depth == 0
        }
        _ => false,
    })
}

/// Walks `css` from `from`, skipping quoted strings and comments, and returns
/// the byte offset of the first character for which `stop` is true.
fn scan(css: &str, from: usize, mut stop: impl FnMut(char) -> bool) -> Option<usize> {
    let mut chars = css[from..].char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((offset, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '/' if matches!(chars.peek(), Some(&(_, '*'))) => {
                chars.next();
                let mut previous = ' ';
                for (_, inner) in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            _ if stop(c) => return Some(from + offset),
            _ => {}
        }
    }
    None
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SCOPE: &str = r#"[data-theme-scope="biz1"]"#;

    #[rstest]
    #[case(".hero", r#"[data-theme-scope="biz1"] .hero"#)]
    #[case("h1, h2", r#"[data-theme-scope="biz1"] h1, [data-theme-scope="biz1"] h2"#)]
    #[case("body", r#"[data-theme-scope="biz1"]"#)]
    #[case("html", r#"[data-theme-scope="biz1"]"#)]
    #[case("body .hero", r#"[data-theme-scope="biz1"] .hero"#)]
    #[case("html body .x", r#"[data-theme-scope="biz1"] .x"#)]
    #[case("html > body.dark p", r#"[data-theme-scope="biz1"].dark p"#)]
    #[case("body > main", r#"[data-theme-scope="biz1"] > main"#)]
    #[case(".x [data-theme-scope=\"biz1\"]", r#"[data-theme-scope="biz1"] .x [data-theme-scope="biz1"]"#)]
    #[case(":root.dark", r#"[data-theme-scope="biz1"].dark"#)]
    #[case(".body-copy", r#"[data-theme-scope="biz1"] .body-copy"#)]
    #[case("body-x", r#"[data-theme-scope="biz1"] body-x"#)]
    #[case(":is(.a, .b) p", r#"[data-theme-scope="biz1"] :is(.a, .b) p"#)]
    #[case(r#"a[title="x,y"]"#, r#"[data-theme-scope="biz1"] a[title="x,y"]"#)]
    #[case(r#"[data-theme-scope="biz1"] .card"#, r#"[data-theme-scope="biz1"] .card"#)]
    fn selector_lists_are_scoped(#[case] prelude: &str, #[case] expected: &str) {
        assert_eq!(scope_selector_list(SCOPE, prelude), expected);
    }

    #[test]
    fn rules_are_prefixed_and_bodies_kept() {
        let scoped = scope_custom_css(SCOPE, ".hero { color: red; }\n\na:hover{text-decoration:none}");
        assert_eq!(
            scoped.rules,
            "[data-theme-scope=\"biz1\"] .hero { color: red; }\n\
             [data-theme-scope=\"biz1\"] a:hover {text-decoration:none}\n"
        );
        assert!(scoped.hoisted_declarations.is_empty());
    }

    #[test]
    fn root_blocks_are_hoisted() {
        let scoped = scope_custom_css(SCOPE, ":root { --brand: #abc123; --gap: 4px }\n.x { gap: var(--gap); }");
        assert_eq!(scoped.hoisted_declarations, vec!["--brand: #abc123", "--gap: 4px"]);
        assert!(!scoped.rules.contains(":root"));
        assert!(scoped.rules.contains(r#"[data-theme-scope="biz1"] .x { gap: var(--gap); }"#));
    }

    #[test]
    fn non_grouping_at_rules_pass_through_unmodified() {
        let css = "@keyframes pulse { from { opacity: 0; } to { opacity: 1; } }\n\
                   @font-face { font-family: Brand; src: url(\"brand.woff2\"); }\n\
                   @import url(\"x.css\");";
        let scoped = scope_custom_css(SCOPE, css);
        assert_eq!(
            scoped.rules,
            "@keyframes pulse { from { opacity: 0; } to { opacity: 1; } }\n\
             @font-face { font-family: Brand; src: url(\"brand.woff2\"); }\n\
             @import url(\"x.css\");\n"
        );
    }

    #[test]
    fn rules_inside_media_queries_are_scoped() {
        let css = "@media (max-width: 600px) { :root { --primary: red; } body { background: black; } .hero { padding: 0; } }";
        let scoped = scope_custom_css(SCOPE, css);
        assert_eq!(
            scoped.rules,
            "@media (max-width: 600px) {\n\
             [data-theme-scope=\"biz1\"] { --primary: red; }\n\
             [data-theme-scope=\"biz1\"] { background: black; }\n\
             [data-theme-scope=\"biz1\"] .hero { padding: 0; }\n\
             }\n"
        );
        assert!(!scoped.rules.contains(":root"));
        assert!(scoped.hoisted_declarations.is_empty());
    }

    #[test]
    fn nested_grouping_rules_are_scoped_all_the_way_down() {
        let css = "@supports (display: grid) { @MEDIA screen { .grid { display: grid; } } }\n@layer base { a { color: red; } }";
        let scoped = scope_custom_css(SCOPE, css);
        assert_eq!(
            scoped.rules,
            "@supports (display: grid) {\n\
             @MEDIA screen {\n\
             [data-theme-scope=\"biz1\"] .grid { display: grid; }\n\
             }\n\
             }\n\
             @layer base {\n\
             [data-theme-scope=\"biz1\"] a { color: red; }\n\
             }\n"
        );
    }

    #[test]
    fn grouping_rules_nested_too_deeply_are_dropped() {
        let css = format!("{}.x {{ color: red; }}{}", "@media all {".repeat(12), "}".repeat(12));
        let scoped = scope_custom_css(SCOPE, &css);
        assert!(!scoped.rules.contains(".x"));
        assert_eq!(scoped.rules.matches("@media all {").count(), MAX_GROUPING_DEPTH);
    }

    #[test]
    fn negated_scope_is_not_mistaken_for_scoped() {
        let scoped = scope_custom_css(SCOPE, r#"div:not([data-theme-scope="biz1"]) { display: none }"#);
        assert_eq!(
            scoped.rules,
            "[data-theme-scope=\"biz1\"] div:not([data-theme-scope=\"biz1\"]) { display: none }\n"
        );
    }

    #[test]
    fn braces_inside_strings_and_comments_do_not_confuse_the_scanner() {
        let css = ".a::after { content: \"}\"; } /* .b { } */ .c { color: blue; }";
        let scoped = scope_custom_css(SCOPE, css);
        assert_eq!(
            scoped.rules,
            "[data-theme-scope=\"biz1\"] .a::after { content: \"}\"; }\n\
             /* .b { } */\n\
             [data-theme-scope=\"biz1\"] .c { color: blue; }\n"
        );
    }

    #[rstest]
    #[case(".a { color: red;")]
    #[case("}}} .a {")]
    #[case("{{{{")]
    #[case("/* unterminated")]
    #[case("\"unterminated { string")]
    #[case(":root {")]
    #[case("héllo { cölor: réd } ünïcode")]
    #[case(";;;")]
    #[case("@media screen {")]
    #[case("@media { } } @supports (x) { :root {")]
    fn malformed_input_never_panics(#[case] css: &str) {
        let _ = scope_custom_css(SCOPE, css);
    }

    #[test]
    fn unterminated_block_is_closed() {
        let scoped = scope_custom_css(SCOPE, ".a { color: red;");
        assert_eq!(scoped.rules, "[data-theme-scope=\"biz1\"] .a { color: red;}\n");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(scope_custom_css(SCOPE, "  \n\t "), ScopedCustomCss::default());
    }
}
