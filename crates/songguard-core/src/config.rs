//! Configuration management for songguard

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub search: SearchConfig,
    pub moderation: ModerationConfig,
    pub sentiment: SentimentConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address of the moderation API
    pub bind: String,
    /// Listen address of a classifier backend instance
    pub backend_bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Base URL of the video platform (watch pages live under `/watch`)
    pub youtube_base_url: String,
    /// Transcript language preference, most preferred first
    #[serde(deserialize_with = "string_list::deserialize")]
    pub transcript_languages: Vec<String>,
    /// Bound on every page fetch, in seconds
    pub fetch_timeout_secs: u64,
    /// Bound on one candidate link (fetch + extraction), in seconds
    pub link_timeout_secs: u64,
    /// Candidate links kept per search strategy
    pub max_candidates: usize,
    pub user_agent: String,
    /// JSON list of `{name, value}` cookies seeding the persistent search session
    pub cookies_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub google_base_url: String,
    pub yahoo_base_url: String,
    /// Strategy order: any of "google", "yahoo", "google-fresh"
    #[serde(deserialize_with = "string_list::deserialize")]
    pub strategies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Polish lexicon; any match here rejects the song
    pub primary_lexicon: PathBuf,
    /// English lexicon
    pub secondary_lexicon: PathBuf,
    pub title_blacklist: PathBuf,
    /// Combined matches allowed before the song is rejected
    pub max_matches: usize,
    /// Lyrics this short or shorter count as not found
    pub min_lyrics_length: usize,
    pub detection_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Backend instance URLs, tried round-robin
    #[serde(deserialize_with = "string_list::deserialize")]
    pub endpoints: Vec<String>,
    /// Secret presented to backends with every request
    pub shared_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Model API keys, rotated round-robin
    #[serde(deserialize_with = "string_list::deserialize")]
    pub credentials: Vec<String>,
    pub model: String,
    pub api_base_url: String,
    pub max_attempts: usize,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0:5000".to_string(),
                backend_bind: "0.0.0.0:8000".to_string(),
            },
            sources: SourcesConfig {
                youtube_base_url: "https://www.youtube.com".to_string(),
                transcript_languages: vec!["en".to_string(), "pl".to_string()],
                fetch_timeout_secs: 10,
                link_timeout_secs: 10,
                max_candidates: 5,
                user_agent: "Mozilla/5.0".to_string(),
                cookies_file: None,
            },
            search: SearchConfig {
                google_base_url: "https://www.google.pl".to_string(),
                yahoo_base_url: "https://search.yahoo.com".to_string(),
                strategies: vec![
                    "google".to_string(),
                    "yahoo".to_string(),
                    "google-fresh".to_string(),
                ],
            },
            moderation: ModerationConfig {
                primary_lexicon: PathBuf::from("data/lexicon_pl.txt"),
                secondary_lexicon: PathBuf::from("data/lexicon_en.txt"),
                title_blacklist: PathBuf::from("data/title_blacklist.txt"),
                max_matches: 5,
                min_lyrics_length: 100,
                detection_timeout_ms: 2000,
            },
            sentiment: SentimentConfig {
                endpoints: Vec::new(),
                shared_key: String::new(),
                request_timeout_secs: 30,
            },
            backend: BackendConfig {
                credentials: Vec::new(),
                model: songguard_classifier::DEFAULT_MODEL.to_string(),
                api_base_url: songguard_classifier::DEFAULT_API_BASE.to_string(),
                max_attempts: songguard_classifier::DEFAULT_MAX_ATTEMPTS,
                retry_delay_ms: 1000,
                request_timeout_secs: 30,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(default_config) = Self::default_config_path() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // Nested keys, e.g. SONGGUARD_SENTIMENT__SHARED_KEY
        figment = figment.merge(Env::prefixed("SONGGUARD_").split("__"));

        // Flat aliases for the deployment-provided lists and secret.
        // Env keys keep their original case.
        figment = figment.merge(
            Env::prefixed("SONGGUARD_")
                .only(&["endpoints", "credentials", "shared_key"])
                .map(|key| {
                    if key.as_str().eq_ignore_ascii_case("endpoints") {
                        Uncased::from("sentiment.endpoints")
                    } else if key.as_str().eq_ignore_ascii_case("credentials") {
                        Uncased::from("backend.credentials")
                    } else {
                        Uncased::from("sentiment.shared_key")
                    }
                }),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("songguard/config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.max_candidates == 0 {
            return Err(ConfigError::InvalidValue(
                "sources.max_candidates must be at least 1".to_string(),
            ));
        }
        if self.backend.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "backend.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.fetch_timeout_secs)
    }

    pub fn link_timeout(&self) -> Duration {
        Duration::from_secs(self.sources.link_timeout_secs)
    }

    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.moderation.detection_timeout_ms)
    }

    pub fn sentiment_timeout(&self) -> Duration {
        Duration::from_secs(self.sentiment.request_timeout_secs)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

/// Accepts either a list or a comma-separated string.
mod string_list {
    use serde::de::{self, Deserializer, SeqAccess, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = Vec<String>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of strings or a comma-separated string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<String>()? {
                    let item = item.trim();
                    if !item.is_empty() {
                        items.push(item.to_string());
                    }
                }
                Ok(items)
            }
        }

        deserializer.deserialize_any(ListVisitor)
    }
}
