//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (cookies, TLS, timeout, decompression)
//! - One GET per URL with browser-like headers and an optional Referer
//! - Racing each request against the crawl's cancellation signal
//! - Error classification
//!
//! The fetcher never looks at status codes; deciding what is broken is the
//! collector's job.

use crate::config::HttpConfig;
use crate::crawler::cancel::CancelSignal;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT,
};
use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";
const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate, br";

/// Why a fetch produced no usable response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("redirect failed: {0}")]
    Redirect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Request(String),
}

impl FetchError {
    /// HTTP status reported alongside this error; always 0 (no response)
    pub fn status(&self) -> u16 {
        0
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_redirect() {
            FetchError::Redirect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Builds the HTTP client shared by every fetch of a crawl
///
/// The client keeps a cookie store for the whole run, follows redirects,
/// transparently decodes gzip/deflate/brotli bodies, and optionally accepts
/// invalid TLS certificates. The User-Agent is set per request by
/// [`Fetcher`].
///
/// # Example
///
/// ```no_run
/// use linkwalk::config::HttpConfig;
/// use linkwalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .cookie_store(true)
        .danger_accept_invalid_certs(config.ignore_certificate_errors)
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header value denotes an HTML document
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// A response whose headers have arrived
///
/// Owns the connection's body stream; dropping it releases the stream on
/// every path, including early returns.
#[derive(Debug)]
pub struct FetchedResponse {
    status: u16,
    final_url: Url,
    content_type: Option<String>,
    response: Response,
}

impl FetchedResponse {
    fn new(response: Response) -> Self {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            status: response.status().as_u16(),
            final_url: response.url().clone(),
            content_type,
            response,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// URL the response came from, after redirects
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn is_html(&self) -> bool {
        self.content_type().is_some_and(is_html_content_type)
    }

    /// Reads the whole body as text, decoding it per the declared charset
    pub async fn read_body(self, cancel: &CancelSignal) -> Result<String, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            body = self.response.text() => body.map_err(FetchError::from),
        }
    }
}

/// Issues GET requests on behalf of crawl tasks
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    pub fn new(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    /// Fetches `url` once
    ///
    /// # Arguments
    ///
    /// * `cancel` - Crawl-wide cancellation signal
    /// * `url` - The URL to fetch
    /// * `referer` - The page `url` was found on, sent as the Referer header
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedResponse)` - Headers received, whatever the status code
    /// * `Err(FetchError)` - No response (transport failure, timeout, cancellation)
    pub async fn fetch(
        &self,
        cancel: &CancelSignal,
        url: &Url,
        referer: Option<&Url>,
    ) -> Result<FetchedResponse, FetchError> {
        let mut request = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE);

        if let Some(referer) = referer {
            request = request.header(REFERER, referer.as_str());
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = request.send() => result.map(FetchedResponse::new).map_err(FetchError::from),
        }
    }
}
