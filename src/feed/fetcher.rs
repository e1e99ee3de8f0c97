use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Default cap on the response body (5MB)
pub const DEFAULT_MAX_FEED_SIZE: usize = 5 * 1024 * 1024;

/// Errors that can occur while fetching the feed body.
///
/// Fetching is a single attempt: none of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Where and how to fetch the feed.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    /// Maximum accepted body size in bytes
    pub max_bytes: usize,
    /// Overall request timeout; `None` leaves it to the transport
    pub timeout: Option<Duration>,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_bytes: DEFAULT_MAX_FEED_SIZE,
            timeout: None,
        }
    }
}

/// Fetches the raw feed body with one GET request.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection, DNS or TLS errors
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::Timeout`] - `source.timeout` elapsed
/// - [`FetchError::ResponseTooLarge`] - Body exceeded `source.max_bytes`
pub async fn fetch_feed(client: &reqwest::Client, source: &FeedSource) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(feed = %source.url, "Fetching feed");

    // The timeout covers the whole exchange, body included
    let bytes = match source.timeout {
        Some(limit) => tokio::time::timeout(limit, fetch_body(client, source))
            .await
            .map_err(|_| FetchError::Timeout)??,
        None => fetch_body(client, source).await?,
    };

    tracing::debug!(feed = %source.url, bytes = bytes.len(), "Feed fetched");
    Ok(bytes)
}

async fn fetch_body(client: &reqwest::Client, source: &FeedSource) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(&source.url)
        .send()
        .await
        .map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(feed = %source.url, status = %status, "Feed request failed");
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    read_limited_bytes(response, source.max_bytes).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
