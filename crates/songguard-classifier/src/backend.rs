//! Backend instance: credential rotation and bounded retry around the model

use crate::error::ClassifierError;
use crate::gemini::GenerativeModel;
use crate::parse::parse_verdict;
use crate::prompt::{song_prompt, SYSTEM_INSTRUCTION};
use crate::rotation::RotationPool;
use crate::verdict::SentimentVerdict;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_MAX_ATTEMPTS: usize = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub max_attempts: usize,
    pub retry_delay: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

pub struct ClassifierBackend {
    model: Arc<dyn GenerativeModel>,
    credentials: RotationPool<String>,
    settings: BackendSettings,
}

impl ClassifierBackend {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        credentials: Vec<String>,
        settings: BackendSettings,
    ) -> Self {
        let credentials = credentials
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            model,
            credentials: RotationPool::new(credentials),
            settings,
        }
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Classify one song, rotating credentials between attempts.
    pub async fn classify(
        &self,
        lyrics: &str,
        title: &str,
    ) -> Result<SentimentVerdict, ClassifierError> {
        if self.credentials.is_empty() {
            return Err(ClassifierError::NoCredentials);
        }

        let content = song_prompt(title, lyrics);
        let attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=attempts {
            let Some(index) = self.credentials.next_index() else {
                return Err(ClassifierError::NoCredentials);
            };
            let api_key = &self.credentials.items()[index];
            info!("Classifying \"{}\" with credential #{}", title, index);

            let result = match self
                .model
                .generate(api_key, SYSTEM_INSTRUCTION, &content)
                .await
            {
                Ok(raw) => parse_verdict(&raw),
                Err(e) => Err(e),
            };

            match result {
                Ok(verdict) => return Ok(verdict),
                Err(e) => {
                    warn!(
                        "Attempt {}/{} with credential #{} failed: {}",
                        attempt, attempts, index, e
                    );
                    if attempt < attempts {
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                }
            }
        }

        error!("All attempts to reach the classifier failed");
        Err(ClassifierError::Exhausted(attempts))
    }
}
