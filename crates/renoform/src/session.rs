//! The interactive editing loop behind `renoform edit`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::owo_colors::OwoColorize;
use eyre::{Context, Report};
use inquire::validator::{StringValidator, Validation};
use inquire::{Confirm, CustomType, Editor, InquireError, MultiSelect, Select, Text};
use itertools::Itertools;
use renoform_document::reference::{Manager, choices_for};
use renoform_document::{
    AutomergeType, Document, FILE_MATCH_KEY, FieldKind, ListPath, PackageRule, RuleField,
};
use renoform_form::ConfigForm;
use renoform_resolver::{Fetch, ResolveSequence, Resolver};
use serde_json::{Number, Value};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::instrument;

const LIST_PATH_HELP: &str =
    "A top-level key like `labels`, or a nested one like `lockFileMaintenance.schedule`";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum Action {
    #[strum(to_string = "Edit a field")]
    EditField,
    #[strum(to_string = "Remove a field")]
    RemoveField,
    #[strum(to_string = "Add a list item")]
    AddListItem,
    #[strum(to_string = "Remove a list item")]
    RemoveListItem,
    #[strum(to_string = "Add a package rule")]
    AddRule,
    #[strum(to_string = "Edit a package rule")]
    EditRule,
    #[strum(to_string = "Remove a package rule")]
    RemoveRule,
    #[strum(to_string = "Configure a manager")]
    AddManager,
    #[strum(to_string = "Remove a manager")]
    RemoveManager,
    #[strum(to_string = "Edit as raw JSON")]
    EditRawText,
    #[strum(to_string = "Load from a URL")]
    Load,
    #[strum(to_string = "Preview the export")]
    Preview,
    Export,
    Quit,
}

/// The three states of a rule's `automerge`, as offered in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
enum Automerge {
    Inherit,
    True,
    False,
}

impl Automerge {
    fn of(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_bool) {
            None => Self::Inherit,
            Some(true) => Self::True,
            Some(false) => Self::False,
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Self::Inherit => None,
            Self::True => Some(Value::Bool(true)),
            Self::False => Some(Value::Bool(false)),
        }
    }
}

/// An entry of some list, remembering where it came from.
#[derive(Debug, Clone)]
struct Indexed {
    index: usize,
    label: String,
}

impl fmt::Display for Indexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}: {}", self.index, self.label)
    }
}

#[derive(Debug, Clone)]
struct FieldChoice {
    key: String,
    kind: FieldKind,
}

impl fmt::Display for FieldChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, format!("({})", self.kind).purple().italic())
    }
}

/// A [`ConfigForm`] driven from the terminal.
#[derive(Debug)]
pub struct Session<F> {
    form: ConfigForm,
    resolver: Resolver<F>,
    sequence: ResolveSequence,
    output: PathBuf,
    /// What the output file holds as far as this session knows: the last
    /// export, or the loaded document if nothing was exported yet.
    saved: Document,
}

impl<F: Fetch> Session<F> {
    pub fn new(resolver: Resolver<F>, document: &Document, output: PathBuf) -> Self {
        let form = ConfigForm::new(document);
        let saved = form.export();
        Self {
            form,
            resolver,
            sequence: ResolveSequence::default(),
            output,
            saved,
        }
    }

    /// Prompts for actions until the user quits.
    ///
    /// Pressing Esc backs out of the current prompt, Ctrl-C ends the session.
    pub fn run(mut self) -> Result<(), Report> {
        let actions = Action::iter().collect::<Vec<_>>();
        let page_size = actions.len();
        loop {
            let action = match Select::new("What now?", actions.clone())
                .with_page_size(page_size)
                .prompt_skippable()
            {
                Ok(Some(action)) => action,
                Ok(None) | Err(InquireError::OperationInterrupted) => Action::Quit,
                Err(error) => return Err(error).wrap_err("Failed to prompt for an action"),
            };

            if action == Action::Quit {
                if self.confirm_quit()? {
                    return Ok(());
                }
                continue;
            }

            if let Err(report) = self.perform(action) {
                if matches!(
                    report.downcast_ref::<InquireError>(),
                    Some(InquireError::OperationInterrupted)
                ) {
                    return Ok(());
                }
                return Err(report);
            }
        }
    }

    #[instrument(skip(self))]
    fn perform(&mut self, action: Action) -> Result<(), Report> {
        match action {
            Action::EditField => self.edit_field(),
            Action::RemoveField => self.remove_field(),
            Action::AddListItem => self.add_list_item(),
            Action::RemoveListItem => self.remove_list_item(),
            Action::AddRule => {
                self.form.add_package_rule();
                let index = self.form.rules().len().saturating_sub(1);
                self.edit_rule(index)
            }
            Action::EditRule => match self.select_rule("Rule to edit:")? {
                Some(index) => self.edit_rule(index),
                None => Ok(()),
            },
            Action::RemoveRule => {
                if let Some(index) = self.select_rule("Rule to remove:")? {
                    self.form.remove_package_rule(index);
                }
                Ok(())
            }
            Action::AddManager => self.add_manager(),
            Action::RemoveManager => self.remove_manager(),
            Action::EditRawText => self.edit_raw_text(),
            Action::Load => self.load(),
            Action::Preview => {
                print!("{}", self.form.export_json());
                Ok(())
            }
            Action::Export => self.export(),
            Action::Quit => Ok(()),
        }
    }

    fn edit_field(&mut self) -> Result<(), Report> {
        let fields = self
            .form
            .fields()
            .filter(|(_, kind)| !matches!(kind, FieldKind::PackageRules | FieldKind::Other))
            .map(|(key, kind)| FieldChoice {
                key: key.to_owned(),
                kind,
            })
            .collect::<Vec<_>>();
        if fields.is_empty() {
            tracing::warn!("Nothing to edit here, add fields as raw JSON first");
            return Ok(());
        }

        let Some(FieldChoice { key, kind }) = Select::new("Field:", fields).prompt_skippable()?
        else {
            return Ok(());
        };
        let current = self.form.document().get(&key).cloned().unwrap_or(Value::Null);
        let message = format!("{key}:");
        let value = match kind {
            FieldKind::Toggle => Confirm::new(&message)
                .with_default(current.as_bool().unwrap_or_default())
                .prompt_skippable()?
                .map(Value::Bool),
            FieldKind::Number => {
                let mut prompt: CustomType<Number> =
                    CustomType::new(&message).with_error_message("That's not a number.");
                if let Value::Number(number) = current {
                    prompt = prompt.with_default(number);
                }
                prompt.prompt_skippable()?.map(Value::Number)
            }
            FieldKind::Text => Text::new(&message)
                .with_initial_value(current.as_str().unwrap_or_default())
                .prompt_skippable()?
                .map(Value::String),
            FieldKind::TextList => return self.edit_list_item(&key),
            FieldKind::Section => return self.edit_section(&key),
            FieldKind::PackageRules | FieldKind::Other => None,
        };

        if let Some(value) = value {
            self.form.set_field(&key, value);
        }
        Ok(())
    }

    fn remove_field(&mut self) -> Result<(), Report> {
        let keys = self
            .form
            .fields()
            .map(|(key, _)| key.to_owned())
            .collect::<Vec<_>>();
        if keys.is_empty() {
            tracing::warn!("The document is empty");
            return Ok(());
        }
        if let Some(key) = Select::new("Field to remove:", keys).prompt_skippable()? {
            self.form.remove_field(&key);
        }
        Ok(())
    }

    /// Offers the string lists nested in `section` for editing.
    fn edit_section(&mut self, section: &str) -> Result<(), Report> {
        let lists = self
            .form
            .document()
            .get(section)
            .and_then(Value::as_object)
            .map(|nested| {
                nested
                    .iter()
                    .filter(|(key, value)| FieldKind::classify(key, value) == FieldKind::TextList)
                    .map(|(key, _)| key.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if lists.is_empty() {
            tracing::warn!(section, "No lists in this section, add one first");
            return Ok(());
        }

        match Select::new(&format!("{section}:"), lists).prompt_skippable()? {
            Some(key) => self.edit_list_item(&ListPath::nested(section, key).to_string()),
            None => Ok(()),
        }
    }

    fn edit_list_item(&mut self, path: &str) -> Result<(), Report> {
        let items = self.list_items(path);
        if items.is_empty() {
            tracing::warn!(path, "The list is empty, add an item first");
            return Ok(());
        }

        let Some(Indexed { index, label }) =
            Select::new(&format!("{path}:"), items).prompt_skippable()?
        else {
            return Ok(());
        };
        if let Some(value) = Text::new("Value:")
            .with_initial_value(&label)
            .prompt_skippable()?
        {
            self.form.set_list_item(path, index, value.trim());
        }
        Ok(())
    }

    fn add_list_item(&mut self) -> Result<(), Report> {
        let Some(path) = prompt_list_path("Add an item to:")? else {
            return Ok(());
        };
        if !self.form.add_list_item(&path) {
            tracing::warn!(%path, "There's something other than a list there");
            return Ok(());
        }

        let index = self.list_items(&path).len().saturating_sub(1);
        if let Some(value) = Text::new("Value:").prompt_skippable()? {
            self.form.set_list_item(&path, index, value.trim());
        }
        Ok(())
    }

    fn remove_list_item(&mut self) -> Result<(), Report> {
        let Some(path) = prompt_list_path("Remove an item from:")? else {
            return Ok(());
        };
        let items = self.list_items(&path);
        if items.is_empty() {
            tracing::warn!(%path, "Nothing to remove");
            return Ok(());
        }
        if let Some(item) = Select::new("Item to remove:", items).prompt_skippable()? {
            self.form.remove_list_item(&path, item.index);
        }
        Ok(())
    }

    fn list_items(&self, path: &str) -> Vec<Indexed> {
        path.parse::<ListPath>()
            .ok()
            .and_then(|path| path.get(self.form.document()).cloned())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, item)| Indexed {
                index,
                label: display_value(item),
            })
            .collect()
    }

    fn select_rule(&self, message: &str) -> Result<Option<usize>, Report> {
        let rules = self
            .form
            .rules()
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                rule.as_object().map(|rule| Indexed {
                    index,
                    label: summarize_rule(rule),
                })
            })
            .collect::<Vec<_>>();
        if rules.is_empty() {
            tracing::warn!("There are no package rules yet");
            return Ok(None);
        }
        let selected = Select::new(message, rules).prompt_skippable()?;
        Ok(selected.map(|rule| rule.index))
    }

    /// Prompts for fields of the rule at `index` until Esc is pressed.
    fn edit_rule(&mut self, index: usize) -> Result<(), Report> {
        loop {
            let Some(rule) = self.form.rule(index) else {
                return Ok(());
            };
            let fields = RuleField::iter()
                .enumerate()
                .map(|(position, field)| Indexed {
                    index: position,
                    label: format!("{field} = {}", describe_field(rule.get(field.key()))),
                })
                .collect::<Vec<_>>();
            let Some(choice) = Select::new(&format!("Rule #{index}:"), fields)
                .with_help_message("Esc when done")
                .with_page_size(RuleField::iter().count())
                .prompt_skippable()?
            else {
                return Ok(());
            };
            let Some(field) = RuleField::iter().nth(choice.index) else {
                return Ok(());
            };

            let current = rule.get(field.key()).cloned();
            if let Some(value) = prompt_rule_field(field, current.as_ref())? {
                self.form.set_rule_field(index, field, value);
            }
        }
    }

    fn add_manager(&mut self) -> Result<(), Report> {
        let configured = self.form.managers().collect::<Vec<_>>();
        let available = Manager::iter()
            .filter(|manager| !configured.contains(manager))
            .collect::<Vec<_>>();
        if available.is_empty() {
            tracing::warn!("Every known manager is configured already");
            return Ok(());
        }
        let Some(manager) = Select::new("Manager:", available).prompt_skippable()? else {
            return Ok(());
        };
        if !self.form.add_manager(&manager.to_string()) {
            return Ok(());
        }

        let Some(patterns) = Text::new(&format!("{manager} {FILE_MATCH_KEY}:"))
            .with_help_message("Extra file patterns, separated by commas. Leave empty to skip")
            .prompt_skippable()?
        else {
            return Ok(());
        };
        let path = file_match_path(manager);
        for pattern in patterns.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if self.form.add_list_item(&path) {
                let index = self.list_items(&path).len().saturating_sub(1);
                self.form.set_list_item(&path, index, pattern);
            }
        }
        Ok(())
    }

    fn remove_manager(&mut self) -> Result<(), Report> {
        let configured = self.form.managers().collect::<Vec<_>>();
        if configured.is_empty() {
            tracing::warn!("No managers are configured");
            return Ok(());
        }
        if let Some(manager) = Select::new("Manager to remove:", configured).prompt_skippable()? {
            self.form.remove_manager(&manager.to_string());
        }
        Ok(())
    }

    /// Opens the document in `$EDITOR` and parses it back.
    ///
    /// A text that doesn't parse can be edited again or thrown away, the
    /// session never leaves raw text mode with a broken document.
    fn edit_raw_text(&mut self) -> Result<(), Report> {
        self.form.switch_to_raw_text();
        loop {
            let edited = Editor::new("Raw JSON:")
                .with_predefined_text(self.form.raw_text())
                .with_file_extension(".json")
                .prompt_skippable()?;
            let Some(text) = edited else {
                break;
            };
            self.form.set_raw_text(text);
            match self.form.switch_to_structured() {
                Ok(()) => return Ok(()),
                Err(error) => {
                    eprintln!("{}", error.red());
                    let retry = Confirm::new("Keep editing?")
                        .with_default(true)
                        .with_help_message("Otherwise the changes are discarded")
                        .prompt_skippable()?
                        .unwrap_or(false);
                    if !retry {
                        break;
                    }
                }
            }
        }

        self.form.revert_raw_text();
        self.form.switch_to_structured()?;
        Ok(())
    }

    fn load(&mut self) -> Result<(), Report> {
        let Some(input) = Text::new("Load from:")
            .with_help_message("A link to the config file, or to a GitHub repository")
            .prompt_skippable()?
        else {
            return Ok(());
        };

        let ticket = self.sequence.issue();
        let result = self.resolver.resolve(&input);
        match self.sequence.accept(ticket, result) {
            Some(Ok(document)) => {
                self.form.load(&document);
                tracing::info!(%input, "Loaded");
            }
            Some(Err(error)) => {
                tracing::error!(%error, "Keeping the current document");
            }
            None => {}
        }
        Ok(())
    }

    fn export(&mut self) -> Result<(), Report> {
        write_export(&self.output, &self.form.export_json())?;
        self.saved = self.form.export();
        Ok(())
    }

    fn confirm_quit(&self) -> Result<bool, Report> {
        if self.form.export() == self.saved {
            return Ok(true);
        }
        let message = format!("Quit without exporting to {}?", self.output.display());
        let confirmed = Confirm::new(&message)
            .with_default(false)
            .prompt_skippable()?
            .unwrap_or(false);
        Ok(confirmed)
    }
}

/// Writes an exported document to `path`.
pub fn write_export(path: &Path, json: &str) -> Result<(), Report> {
    fs::write(path, json).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(?path, "Exported");
    Ok(())
}

fn prompt_list_path(message: &str) -> Result<Option<String>, Report> {
    let path = Text::new(message)
        .with_help_message(LIST_PATH_HELP)
        .with_validator(list_path_validator())
        .prompt_skippable()?;
    Ok(path.map(|path| path.trim().to_owned()))
}

fn list_path_validator() -> impl StringValidator {
    |input: &str| match input.trim().parse::<ListPath>() {
        Ok(_) => Ok(Validation::Valid),
        Err(error) => Ok(Validation::Invalid(error.to_string().into())),
    }
}

/// Prompts for a new value of `field`.
///
/// `Ok(None)` means the prompt was cancelled, `Ok(Some(None))` that the field
/// should be removed from the rule.
fn prompt_rule_field(
    field: RuleField,
    current: Option<&Value>,
) -> Result<Option<Option<Value>>, Report> {
    let message = format!("{field}:");
    let value = match field {
        RuleField::GroupName | RuleField::MatchCurrentVersion => Text::new(&message)
            .with_initial_value(current.and_then(Value::as_str).unwrap_or_default())
            .prompt_skippable()?
            .map(|text| Some(Value::String(text.trim().to_owned()))),
        RuleField::MatchFileNames => {
            let initial = string_items(current).join(", ");
            Text::new(&message)
                .with_initial_value(&initial)
                .with_help_message("Separate patterns with commas")
                .prompt_skippable()?
                .map(|text| {
                    let patterns = text
                        .split(',')
                        .map(str::trim)
                        .filter(|pattern| !pattern.is_empty())
                        .map(|pattern| Value::String(pattern.to_owned()))
                        .collect();
                    Some(Value::Array(patterns))
                })
        }
        RuleField::MatchManagers
        | RuleField::MatchDatasources
        | RuleField::MatchUpdateTypes
        | RuleField::MatchDepTypes => {
            let selected = string_items(current);
            let mut options = choices_for(field);
            let unknown = selected
                .iter()
                .filter(|item| !options.contains(item))
                .cloned()
                .collect::<Vec<_>>();
            options.extend(unknown);
            let defaults = options
                .iter()
                .positions(|option| selected.contains(option))
                .collect::<Vec<_>>();
            MultiSelect::new(&message, options)
                .with_default(&defaults)
                .prompt_skippable()?
                .map(|chosen| Some(Value::Array(chosen.into_iter().map(Value::String).collect())))
        }
        RuleField::Automerge => {
            let current = Automerge::of(current);
            let choices = Automerge::iter().collect::<Vec<_>>();
            let cursor = choices.iter().position(|choice| *choice == current);
            Select::new(&message, choices)
                .with_starting_cursor(cursor.unwrap_or_default())
                .with_help_message("`inherit` leaves the decision to the presets")
                .prompt_skippable()?
                .map(Automerge::into_value)
        }
        RuleField::AutomergeType => {
            let choices = AutomergeType::iter().collect::<Vec<_>>();
            let cursor = choices
                .iter()
                .position(|choice| current.and_then(Value::as_str) == Some(choice.to_string().as_str()));
            Select::new(&message, choices)
                .with_starting_cursor(cursor.unwrap_or_default())
                .with_help_message("Only used when automerge is true")
                .prompt_skippable()?
                .map(|automerge_type| Some(Value::from(automerge_type)))
        }
    };
    Ok(value)
}

/// The list of file patterns inside of the sub-configuration of `manager`.
fn file_match_path(manager: Manager) -> String {
    ListPath::nested(manager.to_string(), FILE_MATCH_KEY).to_string()
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_owned)
}

fn describe_field(value: Option<&Value>) -> String {
    match value {
        None => String::from("(inherit)"),
        Some(Value::Array(items)) => format!("[{}]", items.iter().map(display_value).join(", ")),
        Some(value) => display_value(value),
    }
}

/// One line describing what a rule matches, for picking it out of a list.
fn summarize_rule(rule: &PackageRule) -> String {
    let matchers = RuleField::iter()
        .filter(|field| field.is_list())
        .filter_map(|field| {
            let items = rule.get(field.key())?.as_array()?;
            let items = items.iter().map(display_value).join(", ");
            (!items.is_empty()).then(|| format!("{field}: {items}"))
        })
        .join("; ");
    let group_name = rule
        .get(RuleField::GroupName.key())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match (group_name, matchers.is_empty()) {
        (Some(name), true) => name.to_owned(),
        (Some(name), false) => format!("{name} [{matchers}]"),
        (None, false) => format!("[{matchers}]"),
        (None, true) => String::from("(matches everything)"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use renoform_document::reference::Manager;
    use renoform_form::ConfigForm;

    use super::{Automerge, describe_field, file_match_path, summarize_rule};

    #[rstest]
    #[case(json!({ "groupName": "rust", "matchManagers": ["cargo"] }), "rust [matchManagers: cargo]")]
    #[case(json!({ "groupName": "  ", "matchUpdateTypes": ["minor", "patch"], "matchDepTypes": [] }), "[matchUpdateTypes: minor, patch]")]
    #[case(json!({ "groupName": "everything" }), "everything")]
    #[case(json!({ "automerge": true }), "(matches everything)")]
    fn rule_summaries(#[case] rule: Value, #[case] expected: &str) {
        let Value::Object(rule) = rule else {
            unreachable!()
        };
        assert_eq!(summarize_rule(&rule), expected);
    }

    #[rstest]
    #[case(None, "(inherit)")]
    #[case(Some(json!(["a", "b"])), "[a, b]")]
    #[case(Some(json!("branch")), "branch")]
    #[case(Some(json!(false)), "false")]
    fn field_descriptions(#[case] value: Option<Value>, #[case] expected: &str) {
        assert_eq!(describe_field(value.as_ref()), expected);
    }

    #[rstest]
    #[case(None, Automerge::Inherit)]
    #[case(Some(json!(true)), Automerge::True)]
    #[case(Some(json!(false)), Automerge::False)]
    #[case(Some(json!("yes")), Automerge::Inherit)]
    fn automerge_states(#[case] value: Option<Value>, #[case] expected: Automerge) {
        assert_eq!(Automerge::of(value.as_ref()), expected);
        assert_eq!(expected.into_value().as_ref(), value.as_ref().filter(|v| v.is_boolean()));
    }

    #[rstest]
    #[case(Manager::Cargo, "cargo.fileMatch")]
    #[case(Manager::GithubActions, "github-actions.fileMatch")]
    fn file_match_paths(#[case] manager: Manager, #[case] expected: &str) {
        assert_eq!(file_match_path(manager), expected);
    }

    #[test]
    fn file_patterns_land_in_the_manager_config() {
        let mut form = ConfigForm::default();
        assert!(form.add_manager("cargo"));
        let path = file_match_path(Manager::Cargo);
        assert!(form.add_list_item(&path));
        assert!(form.set_list_item(&path, 0, "^crates/.*/Cargo\\.toml$"));
        assert_eq!(
            Value::Object(form.document().clone()),
            json!({ "cargo": { "fileMatch": ["^crates/.*/Cargo\\.toml$"] } })
        );
    }
}
