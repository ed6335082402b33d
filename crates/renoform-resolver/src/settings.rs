//! Per-directory configuration interface for **renoform**.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::persist::PersistedEntity;
use crate::resolver::{DEFAULT_BRANCHES, DEFAULT_CONFIG_PATHS};

/// The name exported configs are written under by default.
pub const DEFAULT_EXPORT_FILE: &str = "renovate.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Branches searched when pointed at a whole repository, in order.
    pub branches: Vec<String>,

    /// Config file locations searched on each branch, in order.
    pub config_paths: Vec<String>,

    /// Where `export` writes to.
    pub export_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            branches: DEFAULT_BRANCHES.map(String::from).to_vec(),
            config_paths: DEFAULT_CONFIG_PATHS.map(String::from).to_vec(),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl PersistedEntity for Settings {
    const FILE_PATH: &'static str = "renoform.yml";
}
