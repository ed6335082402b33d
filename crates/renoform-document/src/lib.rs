//! This crate is a part of **[renoform]**.
//!
//! ## What's a configuration document?
//!
//! A configuration document is the contents of a `renovate.json` file: an
//! open-ended mapping from string keys to JSON values. No key is mandatory,
//! and the absence of a key means "let Renovate use its default". Because the
//! schema is huge and keeps growing, the document is **not** modeled as a
//! fixed record. Only a couple of places get special treatment:
//!
//! - the `packageRules` array, whose entries have a fixed set of fields that
//!   the editor knows about (see [`RuleField`]),
//! - manager sub-configurations, keyed by a name from the [`Manager`] list.
//!
//! Everything else is copied through untouched.
//!
//! This crate does not implement an editing session, it only provides types
//! and helpers to be used by other parts of **[renoform]**.
//!
//! [renoform]: https://github.com/exoumoon/renoform
//! [`Manager`]: reference::Manager

use serde_json::{Map, Value};

mod kind;
mod path;
pub mod reference;
mod rule;
mod template;
pub use kind::*;
pub use path::*;
pub use rule::*;
pub use template::*;

/// A **Renovate configuration document**.
///
/// Key order is preserved as encountered, so a document survives a
/// parse-serialize round-trip without being reshuffled.
pub type Document = Map<String, Value>;

/// The top-level key holding the sequence of package rules.
pub const PACKAGE_RULES_KEY: &str = "packageRules";

/// The key inside of a manager sub-configuration holding its file patterns.
pub const FILE_MATCH_KEY: &str = "fileMatch";

/// Returns `true` if `value` carries nothing worth exporting.
///
/// Strings are blank when they only contain whitespace, lists when they are
/// empty. `null` is always blank, any other value never is.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(string) => string.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::is_blank;

    #[rstest]
    #[case::null(json!(null), true)]
    #[case::empty_string(json!(""), true)]
    #[case::whitespace(json!("  \t"), true)]
    #[case::empty_list(json!([]), true)]
    #[case::text(json!("deps"), false)]
    #[case::list_of_blank(json!([""]), false)]
    #[case::false_flag(json!(false), false)]
    #[case::zero(json!(0), false)]
    #[case::empty_object(json!({}), false)]
    fn blankness(#[case] value: Value, #[case] blank: bool) {
        assert_eq!(is_blank(&value), blank);
    }
}
