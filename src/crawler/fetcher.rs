//! HTTP fetcher implementation
//!
//! Pages are fetched with a single GET each. There are no retries: a
//! transport failure or a non-success status is returned to the caller as an
//! error, and the caller aborts the run.

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with the configured User-Agent
///
/// No timeout is set unless `timeout_secs` is configured.
///
/// # Example
///
/// ```no_run
/// use watch_harvest::config::HttpConfig;
/// use watch_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and returns the response body as text
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | DNS failure, refused connection, timeout | `HarvestError::Transport` |
/// | Non-2xx response | `HarvestError::HttpStatus` |
/// | Body could not be read | `HarvestError::Transport` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|source| HarvestError::Transport {
            url: url.to_string(),
            source,
        })
}
