use renoform_document::{
    Document, PACKAGE_RULES_KEY, PackageRule, minimize_rule, normalize_rule,
};
use serde_json::Value;

/// Returns a copy of `document` with every package rule laid out for the
/// structured view. See [`normalize_rule`].
#[must_use]
pub fn normalize_document(document: &Document) -> Document {
    map_rules(document, normalize_rule)
}

/// Returns a copy of `document` with every package rule stripped of empty
/// scaffolding. See [`minimize_rule`].
///
/// Top-level fields other than `packageRules` are copied as-is.
#[must_use]
pub fn minimize_document(document: &Document) -> Document {
    map_rules(document, minimize_rule)
}

/// Serializes `document` the way it ends up in a file: pretty-printed with a
/// 2-space indent and a trailing newline.
#[must_use]
pub fn render(document: &Document) -> String {
    format!("{:#}\n", Value::Object(document.clone()))
}

fn map_rules(document: &Document, map_rule: fn(&PackageRule) -> PackageRule) -> Document {
    document
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(rules) if key == PACKAGE_RULES_KEY => rules
                    .iter()
                    .map(|rule| match rule {
                        Value::Object(rule) => Value::Object(map_rule(rule)),
                        other => other.clone(),
                    })
                    .collect(),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{minimize_document, normalize_document, render};

    fn document(value: Value) -> renoform_document::Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not a document: {other}"),
        }
    }

    #[test]
    fn malformed_rules_are_left_alone() {
        let input = document(json!({ "packageRules": ["oops", { "enabled": false }] }));
        let normalized = normalize_document(&input);
        assert_eq!(normalized["packageRules"][0], json!("oops"));
        assert_eq!(normalized["packageRules"][1]["groupName"], json!(""));
        let minimized = minimize_document(&normalized);
        assert_eq!(
            Value::Object(minimized),
            json!({ "packageRules": ["oops", { "enabled": false }] })
        );
    }

    #[test]
    fn non_array_rules_are_left_alone() {
        let input = document(json!({ "packageRules": { "weird": true } }));
        assert_eq!(normalize_document(&input), input);
    }

    #[test]
    fn top_level_fields_are_not_minimized() {
        let input = document(json!({ "labels": [""], "timezone": "" }));
        assert_eq!(minimize_document(&input), input);
    }

    #[test]
    fn rendering_uses_two_spaces() {
        let input = document(json!({ "labels": ["a"] }));
        assert_eq!(render(&input), "{\n  \"labels\": [\n    \"a\"\n  ]\n}\n");
    }
}
