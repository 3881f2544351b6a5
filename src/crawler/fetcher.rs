//! HTTP fetcher
//!
//! One shared `reqwest::Client` is built at startup and threaded into
//! every component; `fetch` performs a single GET and classifies any
//! failure into the crawl's one propagating error kind.

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by page and asset fetches
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one network GET and returns the raw body bytes.
///
/// Any non-success response status is a `FetchError::Status` carrying
/// the status and URL; transport failures are `FetchError::Network`.
/// No retry, no per-call timeout beyond the client defaults.
pub async fn fetch(client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    Ok(body.to_vec())
}
