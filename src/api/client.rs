use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Create an HTTP client for the patient API.
///
/// Every request carries a JSON content type, the static API key header and
/// the fixed timeout.
pub fn create_client(api_key: &str, timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut key = HeaderValue::from_str(api_key)
        .context("API key contains characters not allowed in an HTTP header")?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .user_agent(concat!("patient-risk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}
