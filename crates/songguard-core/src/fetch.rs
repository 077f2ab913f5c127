//! HTTP plumbing shared by every external source

use crate::error::FetchError;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Build a client with the standard per-request bound and user agent.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).user_agent(user_agent).build()
}

/// GET a page as text, treating non-success statuses as failures.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// `fetch_text` under an explicit deadline.
pub async fn fetch_text_within(
    client: &Client,
    url: &str,
    limit: Duration,
) -> Result<String, FetchError> {
    tokio::time::timeout(limit, fetch_text(client, url))
        .await
        .map_err(|_| FetchError::Timeout(limit))?
}

/// Shorten text for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
