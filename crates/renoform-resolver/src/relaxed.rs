use renoform_document::Document;
use serde_json::Value;

/// Why a fetched body couldn't be used as a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum RelaxedJsonError {
    #[error(transparent)]
    Syntax(#[from] json5::Error),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,
}

/// Parses `text` the way Renovate reads its own config files: comments and
/// trailing commas are allowed.
///
/// # Errors
///
/// Returns an error if `text` isn't valid JSON5 or doesn't hold an object.
pub fn parse_relaxed(text: &str) -> Result<Document, RelaxedJsonError> {
    match json5::from_str::<Value>(text)? {
        Value::Object(document) => Ok(document),
        _ => Err(RelaxedJsonError::NotAnObject),
    }
}
