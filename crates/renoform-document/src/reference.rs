//! Static reference data offered as choices by the structured view.
//!
//! None of these lists are exhaustive, Renovate supports a lot more. They are
//! the common picks, anything else can still be typed in by hand.

use nutype::nutype;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{Document, RuleField};

/// The name of a manager with its own sub-configuration in a [`Document`].
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Display, Serialize, Deserialize)
)]
pub struct ManagerName(String);

/// Package managers that can be configured individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum Manager {
    Ansible,
    Bundler,
    Cargo,
    Composer,
    #[strum(serialize = "docker-compose")]
    DockerCompose,
    Dockerfile,
    #[strum(serialize = "github-actions")]
    GithubActions,
    Gitlabci,
    Gomod,
    Gradle,
    #[strum(serialize = "helm-values")]
    HelmValues,
    Helmv3,
    Maven,
    Npm,
    Nuget,
    Pep621,
    #[strum(serialize = "pip_requirements")]
    PipRequirements,
    Poetry,
    #[strum(serialize = "pre-commit")]
    PreCommit,
    Terraform,
}

impl Manager {
    /// Lists the managers that already have a sub-configuration in `document`.
    pub fn configured_in(document: &Document) -> impl Iterator<Item = Self> + '_ {
        Self::iter().filter(|manager| document.contains_key(&manager.to_string()))
    }
}

/// Where Renovate looks up new versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum Datasource {
    Crate,
    Docker,
    GithubReleases,
    GithubTags,
    Go,
    Helm,
    Maven,
    Npm,
    Nuget,
    Packagist,
    Pypi,
    Rubygems,
    TerraformModule,
}

/// Kinds of updates a package rule can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
    Pin,
    Digest,
    PinDigest,
    LockFileMaintenance,
    Rollback,
    Bump,
    Replacement,
}

/// Commonly extended presets.
pub const PRESETS: &[&str] = &[
    "config:recommended",
    "config:best-practices",
    "config:js-app",
    "config:js-lib",
    ":dependencyDashboard",
    ":semanticCommits",
    ":automergeMinor",
    ":automergeDigest",
    "group:allNonMajor",
    "schedule:weekly",
];

/// Commonly matched dependency types.
pub const DEP_TYPES: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
    "build-dependencies",
    "dev-dependencies",
];

/// Lists every choice offered for a rule list field, as plain strings.
#[must_use]
pub fn choices_for(field: RuleField) -> Vec<String> {
    match field {
        RuleField::MatchManagers => Manager::iter().map(|manager| manager.to_string()).collect(),
        RuleField::MatchDatasources => Datasource::iter().map(|source| source.to_string()).collect(),
        RuleField::MatchUpdateTypes => UpdateType::iter().map(|update| update.to_string()).collect(),
        RuleField::MatchDepTypes => DEP_TYPES.iter().map(ToString::to_string).collect(),
        RuleField::GroupName
        | RuleField::MatchFileNames
        | RuleField::MatchCurrentVersion
        | RuleField::Automerge
        | RuleField::AutomergeType => vec![],
    }
}
