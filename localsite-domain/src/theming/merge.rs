//! Deep merge of a base token tree with a sparse override tree.

use serde_json::{Map, Value};

use crate::theming::types::ThemeTokens;

/// Returns `base` with `overrides` layered on top. Neither input is modified.
///
/// Where both sides hold an object the merge recurses, so siblings of an
/// overridden key survive. Anything else (strings, numbers, arrays, or a type
/// mismatch) is replaced wholesale by the override value.
pub fn merge_themes(base: &ThemeTokens, overrides: &ThemeTokens) -> ThemeTokens {
    ThemeTokens::from(merge_maps(base.as_map(), overrides.as_map()))
}

fn merge_maps(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, override_value) in overrides {
        let value = match (base.get(key), override_value) {
            (Some(Value::Object(base_child)), Value::Object(override_child)) => {
                Value::Object(merge_maps(base_child, override_child))
            }
            _ => override_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tokens(value: Value) -> ThemeTokens {
        ThemeTokens::from_value(value).unwrap()
    }

    fn sample_base() -> ThemeTokens {
        tokens(json!({
            "colors": { "light": { "primary": "#000000", "secondary": "#111111" } },
            "typography": { "fontFamilyBase": "Inter" },
            "effects": { "boxShadow": { "sm": ["0 1px 2px #0000001a", "0 1px 1px #0000000d"] } }
        }))
    }

    #[test]
    fn empty_overrides_return_base() {
        let base = sample_base();
        assert_eq!(merge_themes(&base, &ThemeTokens::new()), base);
    }

    #[test]
    fn empty_base_returns_overrides() {
        let overrides = tokens(json!({ "spacing": { "4": "1rem" } }));
        assert_eq!(merge_themes(&ThemeTokens::new(), &overrides), overrides);
    }

    #[test]
    fn nested_merge_keeps_siblings() {
        let merged = merge_themes(
            &sample_base(),
            &tokens(json!({ "colors": { "light": { "primary": "#00ff00" } } })),
        );
        assert_eq!(merged.get_str(&["colors", "light", "primary"]), Some("#00ff00"));
        assert_eq!(merged.get_str(&["colors", "light", "secondary"]), Some("#111111"));
        assert_eq!(merged.get_str(&["typography", "fontFamilyBase"]), Some("Inter"));
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = merge_themes(
            &sample_base(),
            &tokens(json!({ "effects": { "boxShadow": { "sm": ["none"] } } })),
        );
        assert_eq!(merged.get(&["effects", "boxShadow", "sm"]), Some(&json!(["none"])));
    }

    #[test]
    fn type_mismatch_lets_override_win() {
        let merged = merge_themes(&sample_base(), &tokens(json!({ "typography": "serif" })));
        assert_eq!(merged.get(&["typography"]), Some(&json!("serif")));

        let merged = merge_themes(
            &tokens(json!({ "spacing": "tight" })),
            &tokens(json!({ "spacing": { "4": "1rem" } })),
        );
        assert_eq!(merged.get(&["spacing"]), Some(&json!({ "4": "1rem" })));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let base = sample_base();
        let overrides = tokens(json!({ "colors": { "light": { "primary": "#00ff00" } } }));
        let (base_before, overrides_before) = (base.clone(), overrides.clone());

        let mut merged = merge_themes(&base, &overrides);
        merged.set(&["colors", "light", "secondary"], "#222222");

        assert_eq!(base, base_before);
        assert_eq!(overrides, overrides_before);
    }

    #[test]
    fn null_override_is_stored_as_is() {
        let merged = merge_themes(
            &sample_base(),
            &tokens(json!({ "colors": { "light": { "primary": null } } })),
        );
        assert_eq!(merged.get(&["colors", "light", "primary"]), Some(&Value::Null));
    }
}
