//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the crawler's user agent
//! - GET requests to fetch page content
//! - Status and Content-Type validation
//! - Cooperative cancellation of in-flight requests

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("sitescan/", env!("CARGO_PKG_VERSION"));

/// A failed fetch attempt
///
/// Fetch failures are terminal for the page but never for the crawl; the
/// controller logs them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a client or server error status
    #[error("got HTTP error: {status}")]
    Http { status: StatusCode },

    /// The response is not HTML
    #[error("got non-HTML response: {content_type}")]
    UnsupportedContentType { content_type: String },

    /// Connection, timeout, or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The crawl was cancelled while this request was in flight
    #[error("fetch cancelled")]
    Cancelled,
}

/// Builds the HTTP client shared by all fetch tasks
///
/// Every request carries the fixed `sitescan/<version>` user agent. The
/// client follows redirects and decompresses gzip/brotli bodies.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL and returns its HTML body
///
/// # Validation
///
/// * Status >= 400 → [`FetchError::Http`]
/// * `content-type` header without `text/html` →
///   [`FetchError::UnsupportedContentType`]
///
/// The request races against `cancel`; if the token fires mid-request the
/// future is dropped, which aborts the underlying connection, and
/// [`FetchError::Cancelled`] is returned.
pub async fn fetch_html(
    client: &Client,
    url: &Url,
    cancel: &CancellationToken,
) -> Result<String, FetchError> {
    // biased: always notice cancellation before starting or resuming the
    // request, so a stopped crawl never opens a new connection.
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        res = client.get(url.clone()).send() => res?,
    };

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(FetchError::UnsupportedContentType { content_type });
    }

    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        body = response.text() => body?,
    };

    Ok(body)
}
