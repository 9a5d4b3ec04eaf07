// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Read a response body for logging, capped at `limit` characters.
pub async fn body_preview(response: reqwest::Response, limit: usize) -> String {
    let text = response.text().await.unwrap_or_default();
    text.chars().take(limit).collect()
}
