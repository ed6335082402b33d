use serde_json::Value;

use crate::{Document, PACKAGE_RULES_KEY};

/// The JSON schema Renovate publishes for its config files.
pub const SCHEMA_URL: &str = "https://docs.renovatebot.com/renovate-schema.json";

/// The preset a fresh config extends.
pub const DEFAULT_PRESET: &str = "config:recommended";

/// Returns the hand-authored starting point for a brand new config.
///
/// Everything left out falls back to Renovate's defaults.
#[must_use]
pub fn default_template() -> Document {
    let mut template = Document::new();
    template.insert("$schema".into(), Value::from(SCHEMA_URL));
    template.insert("extends".into(), Value::from(vec![DEFAULT_PRESET]));
    template.insert(PACKAGE_RULES_KEY.into(), Value::Array(vec![]));
    template
}
