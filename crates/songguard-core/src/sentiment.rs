//! Orchestrator-side client for the redundant classifier backends

use crate::error::SentimentError;
use reqwest::Client;
use serde::Serialize;
use songguard_classifier::{RotationPool, SentimentVerdict};
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a single backend did not produce a verdict
#[derive(Error, Debug)]
enum EndpointError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid verdict: {0}")]
    Decode(reqwest::Error),

    #[error("empty verdict")]
    Null,
}

#[derive(Debug, Serialize)]
struct BackendRequest<'a> {
    lyrics: &'a str,
    title: &'a str,
    key: &'a str,
}

pub struct SentimentClient {
    client: Client,
    endpoints: RotationPool<String>,
    shared_key: String,
}

impl SentimentClient {
    pub fn new(client: Client, endpoints: Vec<String>, shared_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoints: RotationPool::new(endpoints),
            shared_key: shared_key.into(),
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Classify lyrics, trying each backend at most once, starting from
    /// wherever the shared rotation left off.
    pub async fn classify(&self, lyrics: &str, title: &str) -> Result<SentimentVerdict, SentimentError> {
        let payload = BackendRequest {
            lyrics,
            title,
            key: &self.shared_key,
        };
        let attempts = self.endpoints.len();

        for _ in 0..attempts {
            let Some(endpoint) = self.endpoints.next() else {
                break;
            };

            match self.try_endpoint(endpoint, &payload).await {
                Ok(verdict) => {
                    info!("Sentiment result from {}: {:?}", endpoint, verdict.sentiment);
                    return Ok(verdict);
                }
                Err(reason) => {
                    warn!("Backend {} failed: {}", endpoint, reason);
                    info!("Trying next backend after failure with {}", endpoint);
                }
            }
        }

        error!("All backends failed to return a valid response");
        Err(SentimentError::AllBackendsFailed { attempts })
    }

    async fn try_endpoint(
        &self,
        endpoint: &str,
        payload: &BackendRequest<'_>,
    ) -> Result<SentimentVerdict, EndpointError> {
        let response = self.client.post(endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: body.trim().chars().take(200).collect(),
            });
        }

        // A backend may answer `null` when it gave up internally.
        let body: Option<SentimentVerdict> = response.json().await.map_err(EndpointError::Decode)?;
        body.ok_or(EndpointError::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_endpoints_fails_immediately() {
        let client = SentimentClient::new(Client::new(), Vec::new(), "key");
        let result = client.classify("lyrics", "title").await;
        assert!(matches!(
            result,
            Err(SentimentError::AllBackendsFailed { attempts: 0 })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_skipped() {
        let client = SentimentClient::new(
            Client::new(),
            vec!["http://127.0.0.1:9/sentiment".to_string()],
            "key",
        );
        assert_eq!(client.endpoint_count(), 1);
        let result = client.classify("lyrics", "title").await;
        assert!(matches!(
            result,
            Err(SentimentError::AllBackendsFailed { attempts: 1 })
        ));
    }
}
