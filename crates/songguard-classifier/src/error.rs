//! Error types for the classifier backend

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("No API credentials configured")]
    NoCredentials,

    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no candidate text")]
    EmptyResponse,

    #[error("Malformed classifier output: {0}")]
    Malformed(String),

    #[error("Classifier failed after {0} attempts")]
    Exhausted(usize),
}
