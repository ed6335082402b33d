use itertools::Itertools;
use url::Url;

/// The host serving raw file contents.
pub const RAW_HOST: &str = "raw.githubusercontent.com";

/// The host serving the web UI of repositories.
pub const WEB_HOST: &str = "github.com";

const WEB_HOST_ALIASES: [&str; 2] = [WEB_HOST, "www.github.com"];

/// One URL the resolver is willing to try.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct Candidate {
    pub url: String,
    /// What to call this candidate when reporting a failure. For conventional
    /// locations inside of a repository this is `branch/path`.
    pub label: String,
}

impl Candidate {
    pub fn direct(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            label: url.clone(),
            url,
        }
    }
}

/// What the user pointed the resolver at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub enum Target {
    /// A single file, fetched as-is.
    File(String),
    /// A whole repository, searched at conventional locations.
    Repository { owner: String, repo: String },
}

impl Target {
    /// Classifies a user-supplied URL or repository reference.
    ///
    /// - `https://raw.githubusercontent.com/...` is fetched directly.
    /// - `https://github.com/{owner}/{repo}/blob/{branch}/{path}` is rewritten
    ///   into its raw counterpart.
    /// - `https://github.com/{owner}/{repo}` is a repository to search.
    /// - Anything else is fetched verbatim.
    ///
    /// A missing `https://` in front of a known host is tolerated.
    pub fn classify(input: &str) -> Self {
        let input = input.trim();
        let Some((input, url)) = parse_lenient(input) else {
            return Self::File(input.to_owned());
        };

        match url.host_str() {
            Some(RAW_HOST) => Self::File(input),
            Some(host) if WEB_HOST_ALIASES.contains(&host) => {
                let segments = url
                    .path_segments()
                    .map(|segments| segments.filter(|segment| !segment.is_empty()).collect_vec())
                    .unwrap_or_default();
                match segments.as_slice() {
                    [owner, repo] => Self::Repository {
                        owner: (*owner).to_owned(),
                        repo: repo.trim_end_matches(".git").to_owned(),
                    },
                    [owner, repo, "blob", branch, path @ ..] if !path.is_empty() => {
                        Self::File(format!(
                            "https://{RAW_HOST}/{owner}/{repo}/{branch}/{path}",
                            path = path.join("/"),
                        ))
                    }
                    _ => Self::File(input),
                }
            }
            _ => Self::File(input),
        }
    }

    /// Lists the URLs to try, in order.
    ///
    /// A repository expands into every `branch × path` combination, all paths
    /// of the first branch before any path of the second one.
    pub fn candidates<B, P>(&self, branches: &[B], paths: &[P]) -> Vec<Candidate>
    where
        B: AsRef<str>,
        P: AsRef<str>,
    {
        match self {
            Self::File(url) => vec![Candidate::direct(url.clone())],
            Self::Repository { owner, repo } => branches
                .iter()
                .cartesian_product(paths)
                .map(|(branch, path)| {
                    let (branch, path) = (branch.as_ref(), path.as_ref());
                    Candidate {
                        url: format!("https://{RAW_HOST}/{owner}/{repo}/{branch}/{path}"),
                        label: format!("{branch}/{path}"),
                    }
                })
                .collect(),
        }
    }
}

fn parse_lenient(input: &str) -> Option<(String, Url)> {
    if let Ok(url) = Url::parse(input) {
        return Some((input.to_owned(), url));
    }
    let is_known_host = std::iter::once(RAW_HOST)
        .chain(WEB_HOST_ALIASES)
        .any(|host| input.starts_with(&format!("{host}/")));
    if !is_known_host {
        return None;
    }
    let prefixed = format!("https://{input}");
    let url = Url::parse(&prefixed).ok()?;
    Some((prefixed, url))
}
