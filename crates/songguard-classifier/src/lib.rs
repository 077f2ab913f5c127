//! Generative content classifier backend for songguard
//!
//! A backend instance receives lyrics from the orchestrator, asks a
//! generative model to grade them against a fixed rubric and returns a
//! structured verdict:
//! - credentials are rotated round-robin across calls
//! - failed or malformed answers are retried a bounded number of times
//! - model output is decoded leniently (fences, surrounding prose)

pub mod api;
mod backend;
mod error;
mod gemini;
pub mod parse;
pub mod prompt;
mod rotation;
mod verdict;

pub use backend::{BackendSettings, ClassifierBackend, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
pub use error::ClassifierError;
pub use gemini::{GeminiClient, GenerativeModel, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use rotation::RotationPool;
pub use verdict::{SentimentLabel, SentimentVerdict};
