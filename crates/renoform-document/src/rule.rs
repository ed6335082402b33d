use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::is_blank;

/// A single entry of the `packageRules` sequence.
///
/// Rules are kept as plain JSON objects so that fields this editor doesn't
/// know about (`matchPackageNames`, `enabled`, `schedule`, ...) survive a
/// load-edit-export cycle verbatim.
pub type PackageRule = Map<String, Value>;

/// The fixed set of [`PackageRule`] fields the editor knows about.
///
/// Variants are listed in their canonical order, which is also the order in
/// which they are laid out in a normalized or exported rule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
#[must_use]
pub enum RuleField {
    /// Free-text label grouping matched updates into a single PR.
    GroupName,
    MatchManagers,
    MatchDatasources,
    MatchFileNames,
    MatchUpdateTypes,
    MatchDepTypes,
    /// A version range or regex the current version has to match.
    MatchCurrentVersion,
    /// Tri-state: absent means "inherit", which is **not** the same as `false`.
    Automerge,
    /// Only meaningful when [`Automerge`](Self::Automerge) is explicitly `true`.
    AutomergeType,
}

impl RuleField {
    /// The JSON key of this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Returns the value this field is populated with when a rule is loaded
    /// or created without it.
    ///
    /// [`Automerge`](Self::Automerge) has no placeholder, filling it in would
    /// turn "inherit" into an explicit choice.
    #[must_use]
    pub fn placeholder(self) -> Option<Value> {
        match self {
            Self::GroupName | Self::MatchCurrentVersion => Some(Value::String(String::new())),
            Self::MatchManagers
            | Self::MatchDatasources
            | Self::MatchFileNames
            | Self::MatchUpdateTypes
            | Self::MatchDepTypes => Some(Value::Array(vec![])),
            Self::Automerge => None,
            Self::AutomergeType => Some(Value::from(AutomergeType::default())),
        }
    }

    /// Whether this field holds a list of strings.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::MatchManagers
                | Self::MatchDatasources
                | Self::MatchFileNames
                | Self::MatchUpdateTypes
                | Self::MatchDepTypes
        )
    }

    /// Returns `true` if `key` names one of the fixed rule fields.
    #[must_use]
    pub fn is_known(key: &str) -> bool {
        Self::iter().any(|field| field.key() == key)
    }
}

/// How Renovate should automerge an update.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AutomergeType {
    /// Commit straight to the base branch once checks pass.
    #[default]
    Branch,
    /// Open a PR and merge it once checks pass.
    Pr,
}

impl From<AutomergeType> for Value {
    fn from(automerge_type: AutomergeType) -> Self {
        Self::String(automerge_type.to_string())
    }
}

/// Creates a new rule with every placeholdered field filled in.
pub fn new_rule() -> PackageRule {
    normalize_rule(&PackageRule::new())
}

/// Lays `rule` out for the structured view.
///
/// The fixed fields come first, in canonical order, with absent ones filled
/// with their [placeholder](RuleField::placeholder). A blank `automergeType`
/// counts as absent, since export drops it. Every other field follows in the
/// order it was encountered, untouched.
pub fn normalize_rule(rule: &PackageRule) -> PackageRule {
    let mut normalized = PackageRule::new();
    for field in RuleField::iter() {
        let value = rule
            .get(field.key())
            .filter(|value| field != RuleField::AutomergeType || !is_blank(value))
            .cloned()
            .or_else(|| field.placeholder());
        if let Some(value) = value {
            normalized.insert(field.key().to_owned(), value);
        }
    }
    normalized.extend(extra_fields(rule));
    normalized
}

/// Strips `rule` down to what is worth writing into a config file.
///
/// - Fixed fields are only kept when they aren't [blank](is_blank).
/// - `automerge` is kept whenever it is an explicit boolean, `false` included.
///   Anything else that isn't blank is passed through untouched.
/// - `automergeType` is only kept when `automerge` is explicitly `true`.
/// - Unknown fields are copied through as-is.
pub fn minimize_rule(rule: &PackageRule) -> PackageRule {
    let automerge = rule.get(RuleField::Automerge.key()).and_then(Value::as_bool);
    let mut minimized = PackageRule::new();
    for field in RuleField::iter() {
        let Some(value) = rule.get(field.key()) else {
            continue;
        };
        let keep = match field {
            RuleField::Automerge => {
                if automerge.is_none() && !is_blank(value) {
                    tracing::warn!(%value, "Keeping a non-boolean `automerge` as-is");
                }
                !is_blank(value)
            }
            RuleField::AutomergeType => automerge == Some(true) && !is_blank(value),
            _ => !is_blank(value),
        };
        if keep {
            minimized.insert(field.key().to_owned(), value.clone());
        }
    }
    minimized.extend(extra_fields(rule));
    minimized
}

fn extra_fields(rule: &PackageRule) -> impl Iterator<Item = (String, Value)> + '_ {
    rule.iter()
        .filter(|(key, _)| !RuleField::is_known(key))
        .map(|(key, value)| (key.clone(), value.clone()))
}
