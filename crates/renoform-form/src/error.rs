/// Errors the [`ConfigForm`](crate::ConfigForm) reports to the user.
///
/// None of these are fatal: the working document is left as it was and only
/// the most recent action is rejected.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("The raw text is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("The raw text must describe a JSON object, found {found} instead")]
    NotAnObject { found: &'static str },
}

pub type Result<T> = std::result::Result<T, FormError>;
