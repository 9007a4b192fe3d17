//! HTTP retrieval of raw feed bytes.
//!
//! Each fetch is a single GET with a bounded timeout; there is no retry and
//! no response size cap. Failures are returned as values and stay scoped to
//! the one feed being fetched — the pipeline continues past them.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Some feed hosts reject requests without a browser-looking agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during a single feed fetch.
///
/// All variants are per-feed and recoverable: the driver records an empty
/// result for the feed and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection refused, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
}

/// Builds the HTTP client shared by all fetches in a run.
///
/// The client carries the `Mozilla/5.0` agent and a total-request timeout,
/// so a slow body read cannot outlive the budget either.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .build()
}

/// Fetches the full response body for `url`.
///
/// # Errors
///
/// - [`FetchError::Timeout`] when the timeout elapses before completion
/// - [`FetchError::HttpStatus`] on a non-2xx response
/// - [`FetchError::Network`] on any transport failure
pub async fn fetch(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let response = tokio::time::timeout(timeout, client.get(url.as_str()).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e)
            }
        })?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    })?;

    Ok(body.to_vec())
}
