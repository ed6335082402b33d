use itertools::Itertools;

/// Everything that can go wrong while resolving a configuration.
///
/// Each variant renders into a single message fit for showing to the user.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Please enter a URL or a repository to load the configuration from")]
    EmptyInput,

    #[error("Failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("No configuration file found, tried {}", describe(.attempts))]
    NotFound { attempts: Vec<Attempt> },
}

/// A failed try at one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub label: String,
    pub reason: String,
}

impl ResolveError {
    /// The labels of every candidate that was tried, in order.
    #[must_use]
    pub fn attempted(&self) -> Vec<&str> {
        match self {
            Self::NotFound { attempts } => attempts
                .iter()
                .map(|attempt| attempt.label.as_str())
                .collect(),
            Self::Transport { url, .. } | Self::Parse { url, .. } => vec![url.as_str()],
            Self::EmptyInput => vec![],
        }
    }
}

fn describe(attempts: &[Attempt]) -> String {
    match attempts {
        [] => String::from("nothing"),
        attempts => attempts.iter().map(|attempt| &attempt.label).join(", "),
    }
}
