use bon::Builder;
use renoform_document::Document;
use tracing::instrument;

use crate::candidate::{Candidate, Target};
use crate::error::{Attempt, ResolveError};
use crate::fetch::{Fetch, HttpFetcher};
use crate::relaxed::parse_relaxed;
use crate::settings::Settings;

/// Branches searched when pointed at a whole repository, in order.
pub const DEFAULT_BRANCHES: [&str; 2] = ["main", "master"];

/// Conventional config file locations searched on each branch, in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "renovate.json",
    ".github/renovate.json",
    ".renovaterc.json",
    ".renovaterc",
];

/// Locates and loads a configuration document from a URL or a repository.
///
/// Candidates are tried one after the other, in a fixed order, and the first
/// one that both responds successfully and parses wins. Nothing is retried,
/// cached or merged.
#[derive(Debug, Builder)]
#[must_use]
pub struct Resolver<F> {
    fetcher: F,
    #[builder(default = DEFAULT_BRANCHES.map(String::from).to_vec())]
    branches: Vec<String>,
    #[builder(default = DEFAULT_CONFIG_PATHS.map(String::from).to_vec())]
    config_paths: Vec<String>,
}

impl Resolver<HttpFetcher> {
    /// Creates a resolver fetching over HTTP, searching where `settings` say.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::builder()
            .fetcher(HttpFetcher::new())
            .branches(settings.branches.clone())
            .config_paths(settings.config_paths.clone())
            .build()
    }
}

impl<F: Fetch> Resolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self::builder().fetcher(fetcher).build()
    }

    /// Lists what [`Self::resolve`] would try for `input`, in order.
    pub fn candidates(&self, input: &str) -> Vec<Candidate> {
        Target::classify(input).candidates(&self.branches, &self.config_paths)
    }

    /// Fetches and parses the configuration `input` points at.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::EmptyInput`] if `input` is blank, before any request
    ///   is made.
    /// - The [`Transport`] or [`Parse`] error of the only candidate, if there
    ///   was just one.
    /// - [`ResolveError::NotFound`] listing every attempt, if there were more.
    ///
    /// [`Transport`]: ResolveError::Transport
    /// [`Parse`]: ResolveError::Parse
    #[instrument(skip(self))]
    pub fn resolve(&self, input: &str) -> Result<Document, ResolveError> {
        if input.trim().is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        let candidates = self.candidates(input);
        let mut failures = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            match self.try_candidate(candidate) {
                Ok(document) => {
                    tracing::info!(url = %candidate.url, "Found a configuration file");
                    return Ok(document);
                }
                Err(error) => {
                    tracing::debug!(label = %candidate.label, %error, "Candidate rejected");
                    failures.push(error);
                }
            }
        }

        if let [_] = candidates.as_slice() {
            if let Some(only_failure) = failures.pop() {
                return Err(only_failure);
            }
        }

        let attempts = candidates
            .into_iter()
            .zip(failures)
            .map(|(candidate, failure)| Attempt {
                label: candidate.label,
                reason: failure.to_string(),
            })
            .collect();
        Err(ResolveError::NotFound { attempts })
    }

    fn try_candidate(&self, candidate: &Candidate) -> Result<Document, ResolveError> {
        let url = &candidate.url;
        let response = self
            .fetcher
            .fetch(url)
            .map_err(|source| ResolveError::Transport {
                url: url.clone(),
                reason: source.to_string(),
            })?;
        if !response.is_success() {
            return Err(ResolveError::Transport {
                url: url.clone(),
                reason: format!("the server responded with status {}", response.status),
            });
        }
        parse_relaxed(&response.body).map_err(|source| ResolveError::Parse {
            url: url.clone(),
            reason: source.to_string(),
        })
    }
}
