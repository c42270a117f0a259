//! Shared blocking HTTP plumbing for the provider adapters.

use super::provider::FetchError;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest slice of an error body echoed back in a diagnostic.
const BODY_SNIPPET_LEN: usize = 200;

/// Total request timeout: none, a request waits until the provider answers
/// or the connection fails. Full AlphaVantage histories can be slow.
const REQUEST_TIMEOUT: Option<Duration> = None;

/// Build the HTTP client shared by all requests of a provider.
pub(crate) fn client() -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(concat!("stockfetch/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(FetchError::from)
}

/// Parse a base URL override.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, FetchError> {
    let url = Url::parse(base)
        .map_err(|e| FetchError::Config(format!("invalid base URL '{base}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Config(format!("invalid base URL '{base}'")));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Config(format!("invalid base URL '{base}'")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Issue a single GET and return the status and body text.
pub(crate) fn get(
    client: &Client,
    url: Url,
    api_key: &str,
) -> Result<(StatusCode, String), FetchError> {
    log::debug!("GET {}", redact(url.as_str(), api_key));
    let response = client.get(url).send()?;
    let status = response.status();
    let body = response.text()?;
    log::debug!("HTTP {status}, {} bytes", body.len());
    Ok((status, body))
}

/// Fail with a network error unless the status is 2xx.
pub(crate) fn ensure_success(status: StatusCode, body: &str) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
    Err(FetchError::Network(format!("HTTP {status}: {}", snippet.trim())))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(FetchError::from_json)
}

/// Replace the API key in a URL before it reaches the logs.
pub(crate) fn redact(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    url.replace(api_key, "***")
}
