//! songguard-core: lyrics moderation pipeline for music-video links

pub mod api;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod lexicon;
pub mod lyrics;
pub mod pipeline;
pub mod profanity;
pub mod search;
pub mod sentiment;
pub mod transcript;
pub mod video;

pub use config::Config;
pub use error::{Result, SongGuardError};
pub use lyrics::{LyricsDocument, LyricsSource};
pub use pipeline::{Outcome, Pipeline, PipelineStage};
pub use profanity::{ProfanityReport, ProfanityVerdict};
