use serde_json::Value;
use strum::Display;

use crate::{Document, PACKAGE_RULES_KEY};

/// How a present top-level field is presented in the structured view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Toggle,
    Number,
    Text,
    /// A list of strings. An empty list counts as one too.
    TextList,
    /// A nested mapping, such as `lockFileMaintenance` or a manager config.
    Section,
    PackageRules,
    /// Anything the structured view has no widget for. Only editable as raw
    /// text.
    Other,
}

impl FieldKind {
    /// Classifies the value stored under `key`.
    #[must_use]
    pub fn classify(key: &str, value: &Value) -> Self {
        match value {
            Value::Array(_) if key == PACKAGE_RULES_KEY => Self::PackageRules,
            Value::Bool(_) => Self::Toggle,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::Text,
            Value::Array(items) if items.iter().all(Value::is_string) => Self::TextList,
            Value::Object(_) => Self::Section,
            Value::Array(_) | Value::Null => Self::Other,
        }
    }
}

/// Lists the fields of `document` in order, alongside their [`FieldKind`].
///
/// Only keys that are present are listed. The structured view never offers
/// a field that the document doesn't already contain.
pub fn fields(document: &Document) -> impl Iterator<Item = (&str, FieldKind)> {
    document
        .iter()
        .map(|(key, value)| (key.as_str(), FieldKind::classify(key, value)))
}
