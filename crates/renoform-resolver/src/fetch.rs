use tracing::instrument;

/// What came back from fetching a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// A request that never produced a [`Response`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{reason}")]
    Unreachable { reason: String },
}

/// Something that can retrieve the contents behind a URL.
pub trait Fetch {
    /// Fetches `url`. A non-success status is **not** an error at this level.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if no response could be obtained at all.
    fn fetch(&self, url: &str) -> Result<Response, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        (**self).fetch(url)
    }
}

/// Fetches over HTTP(S).
#[derive(Debug, Clone)]
#[must_use]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub const USER_AGENT: &str = concat!(
        env!("CARGO_PKG_REPOSITORY"),
        '/',
        env!("CARGO_PKG_VERSION"),
        ' ',
        '(',
        env!("CARGO_PKG_AUTHORS"),
        ')',
    );

    #[expect(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(Self::USER_AGENT)
                .build()
                .expect("Failed to build a Reqwest Client with custom user agent"),
        }
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(Response { status, body })
    }
}
