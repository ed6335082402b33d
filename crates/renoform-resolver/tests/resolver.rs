use std::cell::RefCell;
use std::collections::HashMap;

use indoc::indoc;
use renoform_resolver::{Fetch, FetchError, ResolveError, Resolver, Response};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const REPOSITORY: &str = "https://github.com/acme/widgets";
const RAW_PREFIX: &str = "https://raw.githubusercontent.com/acme/widgets";

/// Serves canned responses and remembers every URL it was asked for.
#[derive(Debug, Default)]
struct FakeFetcher {
    responses: HashMap<String, Result<Response, String>>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn serving(mut self, url: impl Into<String>, body: &str) -> Self {
        self.responses.insert(url.into(), Ok(Response::ok(body)));
        self
    }

    fn failing(mut self, url: impl Into<String>, reason: &str) -> Self {
        self.responses.insert(url.into(), Err(reason.to_owned()));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        self.requested.borrow_mut().push(url.to_owned());
        match self.responses.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(FetchError::Unreachable {
                reason: reason.clone(),
            }),
            None => Ok(Response {
                status: 404,
                body: String::from("404: Not Found"),
            }),
        }
    }
}

#[fixture]
fn config() -> &'static str {
    indoc! {r#"
        {
          // Managed by the platform team.
          "extends": ["config:recommended"],
          "labels": ["dependencies",],
        }
    "#}
}

fn raw(branch: &str, path: &str) -> String {
    format!("{RAW_PREFIX}/{branch}/{path}")
}

#[rstest]
fn first_conventional_location_wins(config: &str) {
    let fetcher = FakeFetcher::default()
        .serving(raw("main", "renovate.json"), config)
        .serving(raw("main", ".github/renovate.json"), "{}")
        .serving(raw("master", "renovate.json"), "{}");
    let resolver = Resolver::new(&fetcher);

    let document = resolver.resolve(REPOSITORY).unwrap();
    assert_eq!(
        Value::Object(document),
        json!({ "extends": ["config:recommended"], "labels": ["dependencies"] })
    );
    assert_eq!(fetcher.requested(), [raw("main", "renovate.json")]);
}

#[rstest]
fn every_candidate_is_tried_in_order(config: &str) {
    let fetcher = FakeFetcher::default().serving(raw("master", ".github/renovate.json"), config);
    let resolver = Resolver::new(&fetcher);

    assert!(resolver.resolve(REPOSITORY).is_ok());
    assert_eq!(
        fetcher.requested(),
        [
            raw("main", "renovate.json"),
            raw("main", ".github/renovate.json"),
            raw("main", ".renovaterc.json"),
            raw("main", ".renovaterc"),
            raw("master", "renovate.json"),
            raw("master", ".github/renovate.json"),
        ]
    );
}

#[rstest]
fn unparseable_candidates_are_skipped(config: &str) {
    let fetcher = FakeFetcher::default()
        .serving(raw("main", "renovate.json"), "<html>definitely not json</html>")
        .failing(raw("main", ".github/renovate.json"), "connection reset")
        .serving(raw("main", ".renovaterc.json"), config);
    let resolver = Resolver::new(&fetcher);

    assert!(resolver.resolve(REPOSITORY).is_ok());
    assert_eq!(fetcher.requested().len(), 3);
}

#[test]
fn exhausted_repository_lists_attempts() {
    let fetcher = FakeFetcher::default();
    let resolver = Resolver::new(&fetcher);

    let error = resolver.resolve(REPOSITORY).unwrap_err();
    assert!(matches!(error, ResolveError::NotFound { ref attempts } if attempts.len() == 8));
    assert_eq!(
        error.attempted(),
        [
            "main/renovate.json",
            "main/.github/renovate.json",
            "main/.renovaterc.json",
            "main/.renovaterc",
            "master/renovate.json",
            "master/.github/renovate.json",
            "master/.renovaterc.json",
            "master/.renovaterc",
        ]
    );
    let message = error.to_string();
    assert!(message.contains("main/.renovaterc.json"));
    assert!(message.contains("master/.renovaterc"));
    assert_eq!(fetcher.requested().len(), 8);
}

#[rstest]
#[case("")]
#[case("   \n\t")]
fn blank_input_makes_no_requests(#[case] input: &str) {
    let fetcher = FakeFetcher::default();
    let resolver = Resolver::new(&fetcher);
    assert!(matches!(resolver.resolve(input), Err(ResolveError::EmptyInput)));
    assert!(fetcher.requested().is_empty());
}

#[rstest]
fn blob_links_are_fetched_raw(config: &str) {
    let fetcher = FakeFetcher::default().serving(raw("develop", "configs/renovate.json5"), config);
    let resolver = Resolver::new(&fetcher);

    let input = "https://github.com/acme/widgets/blob/develop/configs/renovate.json5";
    assert!(resolver.resolve(input).is_ok());
    assert_eq!(fetcher.requested(), [raw("develop", "configs/renovate.json5")]);
}

#[test]
fn single_candidate_reports_its_own_transport_error() {
    let url = "https://example.com/renovate.json";
    let fetcher = FakeFetcher::default().failing(url, "dns lookup failed");
    let resolver = Resolver::new(&fetcher);

    let error = resolver.resolve(url).unwrap_err();
    assert!(matches!(error, ResolveError::Transport { .. }));
    assert_eq!(
        error.to_string(),
        "Failed to fetch https://example.com/renovate.json: dns lookup failed"
    );
}

#[test]
fn single_candidate_reports_its_own_status_error() {
    let fetcher = FakeFetcher::default();
    let resolver = Resolver::new(&fetcher);

    let error = resolver.resolve(&raw("main", "renovate.json")).unwrap_err();
    assert!(
        matches!(error, ResolveError::Transport { ref reason, .. } if reason.contains("404"))
    );
}

#[test]
fn single_candidate_reports_its_own_parse_error() {
    let url = "https://example.com/renovate.json";
    let fetcher = FakeFetcher::default().serving(url, r#"["config:recommended"]"#);
    let resolver = Resolver::new(&fetcher);

    let error = resolver.resolve(url).unwrap_err();
    assert!(matches!(error, ResolveError::Parse { .. }));
}

#[test]
fn custom_search_locations() {
    let fetcher = FakeFetcher::default();
    let resolver = Resolver::builder()
        .fetcher(&fetcher)
        .branches(vec!["trunk".into()])
        .config_paths(vec!["renovate.json5".into(), ".github/renovate.json5".into()])
        .build();

    let labels: Vec<_> = resolver
        .candidates(REPOSITORY)
        .into_iter()
        .map(|candidate| candidate.label)
        .collect();
    assert_eq!(labels, ["trunk/renovate.json5", "trunk/.github/renovate.json5"]);
}
