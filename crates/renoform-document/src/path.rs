use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::Document;

/// The address of a list-valued field: either a top-level key (`labels`) or
/// a key one level down (`lockFileMaintenance.schedule`, `npm.fileMatch`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct ListPath {
    section: Option<String>,
    key: String,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ListPathError {
    #[error("A list path can't have empty segments")]
    EmptySegment,
    #[error("A list path can be at most two segments deep, got {0}")]
    TooDeep(usize),
}

impl ListPath {
    pub const SEPARATOR: char = '.';

    pub fn top_level(key: impl Into<String>) -> Self {
        Self {
            section: None,
            key: key.into(),
        }
    }

    pub fn nested(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            section: Some(section.into()),
            key: key.into(),
        }
    }

    /// Returns the list this path points at, if there is one.
    #[must_use]
    pub fn get<'doc>(&self, document: &'doc Document) -> Option<&'doc Vec<Value>> {
        let container = match &self.section {
            None => document,
            Some(section) => document.get(section)?.as_object()?,
        };
        container.get(&self.key)?.as_array()
    }

    /// Mutable counterpart of [`Self::get`]. Never creates anything.
    #[must_use]
    pub fn get_mut<'doc>(&self, document: &'doc mut Document) -> Option<&'doc mut Vec<Value>> {
        let container = match &self.section {
            None => document,
            Some(section) => document.get_mut(section)?.as_object_mut()?,
        };
        container.get_mut(&self.key)?.as_array_mut()
    }

    /// Returns the list this path points at, creating the section and the
    /// list when they are absent.
    ///
    /// Returns [`None`] when something that is already there has the wrong
    /// shape (e.g. the section is a string), nothing is overwritten then.
    #[must_use]
    pub fn get_or_create<'doc>(
        &self,
        document: &'doc mut Document,
    ) -> Option<&'doc mut Vec<Value>> {
        let container = match &self.section {
            None => document,
            Some(section) => document
                .entry(section.clone())
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()?,
        };
        container
            .entry(self.key.clone())
            .or_insert_with(|| Value::Array(vec![]))
            .as_array_mut()
    }
}

impl FromStr for ListPath {
    type Err = ListPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path.split(Self::SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ListPathError::EmptySegment);
        }
        match segments.as_slice() {
            [key] => Ok(Self::top_level(*key)),
            [section, key] => Ok(Self::nested(*section, *key)),
            deeper => Err(ListPathError::TooDeep(deeper.len())),
        }
    }
}

impl fmt::Display for ListPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(section) = &self.section {
            write!(formatter, "{section}{}", Self::SEPARATOR)?;
        }
        write!(formatter, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{ListPath, ListPathError};
    use crate::Document;

    fn document(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not a document: {other}"),
        }
    }

    #[rstest]
    #[case("labels", Ok(ListPath::top_level("labels")))]
    #[case("npm.fileMatch", Ok(ListPath::nested("npm", "fileMatch")))]
    #[case("", Err(ListPathError::EmptySegment))]
    #[case("npm.", Err(ListPathError::EmptySegment))]
    #[case("a.b.c", Err(ListPathError::TooDeep(3)))]
    fn parsing(#[case] raw: &str, #[case] expected: Result<ListPath, ListPathError>) {
        assert_eq!(raw.parse::<ListPath>(), expected);
        if let Ok(path) = expected {
            assert_eq!(path.to_string(), raw);
        }
    }

    #[test]
    fn creates_missing_containers() {
        let mut doc = Document::new();
        let path = ListPath::nested("lockFileMaintenance", "schedule");
        path.get_or_create(&mut doc)
            .map(|list| list.push(json!("")))
            .unwrap();
        assert_eq!(
            Value::Object(doc),
            json!({ "lockFileMaintenance": { "schedule": [""] } })
        );
    }

    #[test]
    fn refuses_to_overwrite_mismatched_shapes() {
        let mut doc = document(json!({ "npm": "nope", "labels": "also nope" }));
        assert!(ListPath::nested("npm", "fileMatch").get_or_create(&mut doc).is_none());
        assert!(ListPath::top_level("labels").get_or_create(&mut doc).is_none());
        assert_eq!(doc["npm"], json!("nope"));
        assert_eq!(doc["labels"], json!("also nope"));
    }

    #[test]
    fn lookup_never_creates() {
        let mut doc = document(json!({ "labels": ["a"] }));
        assert_eq!(ListPath::top_level("labels").get(&doc).map(Vec::len), Some(1));
        assert!(ListPath::nested("npm", "fileMatch").get_mut(&mut doc).is_none());
        assert!(!doc.contains_key("npm"));
    }
}
