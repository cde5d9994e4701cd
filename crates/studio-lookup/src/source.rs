//! Page sources
//!
//! Design: the extractor only needs page text. A [`PageSource`] turns a
//! source URL into that text; [`HttpPageSource`] does it over HTTP.
//! Tests and embedders can plug in their own source.

use crate::error::LookupError;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Connect + first response byte
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole body
pub const DEFAULT_BODY_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can fetch the download page as text
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Fetch the page at `url` and return its body as text
    async fn fetch_page(&self, url: &str) -> Result<String, LookupError>;
}

/// HTTP page source backed by reqwest
///
/// - Sends a browser-neutral `Accept` for HTML
/// - Fails on non-2xx status
/// - Streams the body under a total deadline; a truncated page is an error
///   since partial markup would only produce misleading match results
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    user_agent: Option<String>,
    connect_timeout: Duration,
    body_timeout: Duration,
}

impl HttpPageSource {
    /// Create a source with default timeouts and User-Agent
    pub fn new() -> Self {
        Self {
            user_agent: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            body_timeout: DEFAULT_BODY_TIMEOUT,
        }
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: Option<String>) -> Self {
        self.user_agent = ua;
        self
    }

    /// Set connect / first-byte timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set total body timeout
    pub fn body_timeout(mut self, timeout: Duration) -> Self {
        self.body_timeout = timeout;
        self
    }

    fn build_client(&self) -> Result<reqwest::Client, LookupError> {
        let mut headers = HeaderMap::new();
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
        );

        reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.connect_timeout)
            .build()
            .map_err(LookupError::ClientBuildError)
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_page(&self, url: &str) -> Result<String, LookupError> {
        let client = self.build_client()?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(LookupError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }

        let (body, truncated) = read_body_with_timeout(response, self.body_timeout).await;
        if truncated {
            return Err(LookupError::BodyTimeout);
        }

        debug!(url, size = body.len(), "Fetched source page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Read response body with timeout, returning partial content if timeout occurs
async fn read_body_with_timeout(response: reqwest::Response, timeout: Duration) -> (Bytes, bool) {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        error!("Error reading body chunk: {}", e);
                        return (Bytes::from(body), true);
                    }
                    None => {
                        return (Bytes::from(body), false);
                    }
                }
            }
            _ = timeout_future => {
                warn!("Body timeout reached, page is incomplete");
                return (Bytes::from(body), true);
            }
        }
    }
}
