//! Error types for songguard-core

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SongGuardError>;

#[derive(Error, Debug)]
pub enum SongGuardError {
    #[error("Video resolution failed: {0}")]
    Video(#[from] VideoError),

    #[error("Sentiment classification failed: {0}")]
    Sentiment(#[from] SentimentError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] songguard_classifier::ClassifierError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to obtain a remote page. Never fatal to the pipeline on its own.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Failed to fetch video page: {0}")]
    PageFetchFailed(#[from] FetchError),

    #[error("Video page has no title")]
    TitleMissing,

    #[error("Title contains blacklisted word: {0}")]
    Blacklisted(String),
}

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("All {attempts} sentiment backends failed")]
    AllBackendsFailed { attempts: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
