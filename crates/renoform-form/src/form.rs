use renoform_document::reference::{Manager, ManagerName};
use renoform_document::{
    Document, FieldKind, ListPath, PACKAGE_RULES_KEY, PackageRule, RuleField, new_rule,
    normalize_rule,
};
use serde_json::{Map, Value};
use strum::Display;
use tracing::instrument;

use crate::error::{FormError, Result};
use crate::export::{minimize_document, normalize_document, render};

/// Which of the two representations of the document is being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum ViewMode {
    /// Field-by-field editing.
    #[default]
    Structured,
    /// Free-form editing of the serialized JSON.
    #[strum(to_string = "raw text")]
    RawText,
}

/// The working copy of a configuration document, editable through two views.
///
/// The form owns its [`Document`] outright: [`load`](Self::load) takes a deep
/// copy, so edits never leak back into whatever the document was loaded
/// from. The two views are never edited at the same time:
///
/// - in [`ViewMode::Structured`], the structured operations (list, rule and
///   manager edits) apply to the document directly;
/// - in [`ViewMode::RawText`], only the raw text buffer changes, and it is
///   parsed back into the document by [`switch_to_structured`].
///
/// Structured operations invoked in the wrong mode, or with an address that
/// doesn't resolve, do nothing and return `false`.
///
/// [`switch_to_structured`]: Self::switch_to_structured
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ConfigForm {
    document: Document,
    raw_text: String,
    view: ViewMode,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self::new(&Document::new())
    }
}

impl ConfigForm {
    pub fn new(document: &Document) -> Self {
        let mut form = Self {
            document: Document::new(),
            raw_text: String::new(),
            view: ViewMode::default(),
        };
        form.load(document);
        form
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    #[must_use]
    pub const fn view(&self) -> ViewMode {
        self.view
    }

    /// Replaces the working document with a normalized copy of `document`.
    ///
    /// Every package rule gets its missing fields filled with placeholders,
    /// everything else is copied verbatim. The raw text is regenerated.
    #[instrument(level = "debug", skip_all, fields(keys = document.len()))]
    pub fn load(&mut self, document: &Document) {
        self.document = normalize_document(document);
        self.raw_text = render(&self.document);
    }

    /// Serializes the document into the raw text buffer and switches to
    /// [`ViewMode::RawText`].
    pub fn switch_to_raw_text(&mut self) {
        self.raw_text = render(&self.document);
        self.view = ViewMode::RawText;
    }

    /// Replaces the raw text buffer. Ignored outside of [`ViewMode::RawText`].
    pub fn set_raw_text(&mut self, raw_text: impl Into<String>) -> bool {
        if self.view != ViewMode::RawText {
            tracing::debug!(view = %self.view, "Ignoring raw text outside of the raw text view");
            return false;
        }
        self.raw_text = raw_text.into();
        true
    }

    /// Throws away hand edits by regenerating the raw text from the document.
    pub fn revert_raw_text(&mut self) {
        self.raw_text = render(&self.document);
    }

    /// Parses the raw text buffer and, if it holds a JSON object, loads it and
    /// switches to [`ViewMode::Structured`].
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Syntax`] if the raw text is not valid (strict)
    /// JSON and [`FormError::NotAnObject`] if it is valid JSON of some other
    /// shape. In both cases the document and the view mode stay untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn switch_to_structured(&mut self) -> Result<()> {
        if self.view == ViewMode::Structured {
            return Ok(());
        }
        match serde_json::from_str::<Value>(&self.raw_text)? {
            Value::Object(document) => {
                self.load(&document);
                self.view = ViewMode::Structured;
                Ok(())
            }
            other => Err(FormError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Lists the fields present in the document, in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        renoform_document::fields(&self.document)
    }

    /// Overwrites a top-level field that is already present.
    ///
    /// Package rules have their own operations and can't be replaced
    /// wholesale here.
    pub fn set_field(&mut self, key: &str, value: Value) -> bool {
        if !self.accepts_structured_edits("set_field") || key == PACKAGE_RULES_KEY {
            return false;
        }
        match self.document.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                tracing::debug!(key, "Not synthesizing an absent field");
                false
            }
        }
    }

    /// Removes a top-level field altogether.
    pub fn remove_field(&mut self, key: &str) -> bool {
        self.accepts_structured_edits("remove_field") && self.document.shift_remove(key).is_some()
    }

    /// Appends an empty string to the list at `path`, creating the list and
    /// its section if needed.
    pub fn add_list_item(&mut self, path: &str) -> bool {
        if !self.accepts_structured_edits("add_list_item") || path == PACKAGE_RULES_KEY {
            return false;
        }
        let list = path
            .parse::<ListPath>()
            .ok()
            .and_then(|path| path.get_or_create(&mut self.document));
        match list {
            Some(list) => {
                list.push(Value::String(String::new()));
                true
            }
            None => {
                tracing::debug!(path, "No list to add an item to");
                false
            }
        }
    }

    /// Removes the element at `index` of the list at `path`.
    pub fn remove_list_item(&mut self, path: &str, index: usize) -> bool {
        if !self.accepts_structured_edits("remove_list_item") {
            return false;
        }
        match self.list_mut(path) {
            Some(list) if index < list.len() => {
                list.remove(index);
                true
            }
            _ => {
                tracing::debug!(path, index, "No list item to remove");
                false
            }
        }
    }

    /// Overwrites the element at `index` of the list at `path`.
    pub fn set_list_item(&mut self, path: &str, index: usize, value: impl Into<String>) -> bool {
        if !self.accepts_structured_edits("set_list_item") {
            return false;
        }
        match self.list_mut(path).and_then(|list| list.get_mut(index)) {
            Some(item) => {
                *item = Value::String(value.into());
                true
            }
            None => false,
        }
    }

    /// The package rules of the document. Empty if there are none.
    #[must_use]
    pub fn rules(&self) -> &[Value] {
        self.document
            .get(PACKAGE_RULES_KEY)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn rule(&self, index: usize) -> Option<&PackageRule> {
        self.rules().get(index)?.as_object()
    }

    /// Appends a new rule with all of its fields set to placeholders.
    pub fn add_package_rule(&mut self) -> bool {
        if !self.accepts_structured_edits("add_package_rule") {
            return false;
        }
        let rules = self
            .document
            .entry(PACKAGE_RULES_KEY)
            .or_insert_with(|| Value::Array(vec![]))
            .as_array_mut();
        match rules {
            Some(rules) => {
                rules.push(Value::Object(new_rule()));
                true
            }
            None => {
                tracing::debug!("`packageRules` is not a list, leaving it alone");
                false
            }
        }
    }

    /// Removes the rule at `index`. Rules after it shift down by one.
    pub fn remove_package_rule(&mut self, index: usize) -> bool {
        if !self.accepts_structured_edits("remove_package_rule") {
            return false;
        }
        match self.rules_mut() {
            Some(rules) if index < rules.len() => {
                rules.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Sets one of the fixed fields of the rule at `index`, or clears it when
    /// `value` is [`None`].
    ///
    /// Clearing [`RuleField::Automerge`] brings the rule back to "inherit".
    /// Clearing any other field puts its placeholder back.
    pub fn set_rule_field(&mut self, index: usize, field: RuleField, value: Option<Value>) -> bool {
        if !self.accepts_structured_edits("set_rule_field") {
            return false;
        }
        let Some(rule) = self
            .rules_mut()
            .and_then(|rules| rules.get_mut(index))
            .and_then(Value::as_object_mut)
        else {
            tracing::debug!(index, %field, "No such package rule");
            return false;
        };
        match value {
            Some(value) => {
                rule.insert(field.key().to_owned(), value);
            }
            None => {
                rule.shift_remove(field.key());
            }
        }
        *rule = normalize_rule(rule);
        true
    }

    /// Creates an empty sub-configuration for the manager `name`.
    ///
    /// Does nothing if `name` is blank or the manager is already configured.
    pub fn add_manager(&mut self, name: &str) -> bool {
        if !self.accepts_structured_edits("add_manager") {
            return false;
        }
        let Ok(name) = ManagerName::try_new(name) else {
            tracing::debug!("Refusing to add a manager with a blank name");
            return false;
        };
        if self.document.contains_key(name.as_ref()) {
            tracing::debug!(%name, "Manager is already configured");
            return false;
        }
        self.document
            .insert(name.into_inner(), Value::Object(Map::new()));
        true
    }

    /// Removes the sub-configuration of the manager `name` entirely.
    pub fn remove_manager(&mut self, name: &str) -> bool {
        self.accepts_structured_edits("remove_manager")
            && self.document.shift_remove(name).is_some()
    }

    /// Lists the known managers that have a sub-configuration.
    pub fn managers(&self) -> impl Iterator<Item = Manager> + '_ {
        Manager::configured_in(&self.document)
    }

    /// Returns the minimized document: package rules lose their empty
    /// scaffolding, everything else is exported as-is.
    ///
    /// The output only depends on the document, so exporting the same
    /// document twice yields byte-identical JSON.
    pub fn export(&self) -> Document {
        minimize_document(&self.document)
    }

    /// [`export`](Self::export), serialized for a file or the terminal.
    #[must_use]
    pub fn export_json(&self) -> String {
        render(&self.export())
    }

    fn accepts_structured_edits(&self, operation: &'static str) -> bool {
        let accepts = self.view == ViewMode::Structured;
        if !accepts {
            tracing::debug!(operation, view = %self.view, "Structured edit ignored");
        }
        accepts
    }

    fn list_mut(&mut self, path: &str) -> Option<&mut Vec<Value>> {
        path.parse::<ListPath>()
            .ok()
            .and_then(|path| path.get_mut(&mut self.document))
    }

    fn rules_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.document
            .get_mut(PACKAGE_RULES_KEY)
            .and_then(Value::as_array_mut)
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
