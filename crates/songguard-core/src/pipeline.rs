//! Pipeline orchestration: video → lyrics → profanity → sentiment

use crate::config::Config;
use crate::error::{ConfigError, SongGuardError, VideoError};
use crate::fetch::build_client;
use crate::lexicon::{read_lines, Language, Lexicon};
use crate::lyrics::{LyricsDocument, LyricsResolver, LyricsSource};
use crate::profanity::{strip_emoji, ProfanityClassifier, ProfanityReport, ProfanityVerdict};
use crate::sentiment::SentimentClient;
use crate::transcript::TranscriptSource;
use crate::video::{TitleBlacklist, VideoResolver};

use songguard_classifier::SentimentVerdict;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Code reported when lyrics could not be obtained (manual review).
pub const CODE_LYRICS_ISSUE: u8 = 1;
/// Code reported for every rejection and failure.
pub const CODE_REJECT: u8 = 2;

/// Terminal result of one moderation request
#[derive(Debug, Clone)]
pub enum Outcome {
    TitleRejected { reason: String },
    LyricsNotFound,
    TooManyProfanity { report: ProfanityReport },
    UnsupportedLanguage,
    Classified { verdict: SentimentVerdict, source: LyricsSource },
    BackendsExhausted,
}

impl Outcome {
    /// Numeric verdict reported to the caller
    pub fn code(&self) -> u8 {
        match self {
            Outcome::Classified { verdict, .. } => verdict.sentiment.code(),
            Outcome::LyricsNotFound => CODE_LYRICS_ISSUE,
            Outcome::TitleRejected { .. }
            | Outcome::TooManyProfanity { .. }
            | Outcome::UnsupportedLanguage
            | Outcome::BackendsExhausted => CODE_REJECT,
        }
    }

    /// Human-readable reason, absent for a classified song
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Outcome::TitleRejected { .. } => Some("Title issue"),
            Outcome::LyricsNotFound => Some("Lyrics issue"),
            Outcome::TooManyProfanity { .. } => Some("Too many swear words"),
            Outcome::UnsupportedLanguage => Some("Language not supported"),
            Outcome::BackendsExhausted => Some("Sentiment service unavailable"),
            Outcome::Classified { .. } => None,
        }
    }

    /// True when the caller should see a service-unavailable response
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Outcome::BackendsExhausted)
    }
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    ResolvingVideo,
    VideoResolved { title: String },
    FetchingTranscript,
    SearchingLyrics,
    LyricsFound { source: LyricsSource },
    CheckingProfanity,
    ClassifyingSentiment,
    Complete { code: u8, duration: Duration },
    Failed { stage: String, error: String },
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub min_lyrics_length: usize,
    pub detection_timeout: Duration,
}

/// Main moderation pipeline, shared by all requests
pub struct Pipeline {
    video: VideoResolver,
    transcript: TranscriptSource,
    lyrics: LyricsResolver,
    profanity: Arc<ProfanityClassifier>,
    sentiment: SentimentClient,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        video: VideoResolver,
        transcript: TranscriptSource,
        lyrics: LyricsResolver,
        profanity: ProfanityClassifier,
        sentiment: SentimentClient,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            video,
            transcript,
            lyrics,
            profanity: Arc::new(profanity),
            sentiment,
            settings,
        }
    }

    /// Load word lists and build every stage from configuration
    pub fn from_config(config: &Config) -> Result<Self, SongGuardError> {
        let client = build_client(config.fetch_timeout(), &config.sources.user_agent)?;

        let primary = Lexicon::load(Language::Polish, &config.moderation.primary_lexicon);
        let secondary = Lexicon::load(Language::English, &config.moderation.secondary_lexicon);

        let mut blacklist_terms = read_lines(&config.moderation.title_blacklist);
        blacklist_terms.extend(primary.terms().iter().cloned());
        blacklist_terms.extend(secondary.terms().iter().cloned());
        let blacklist = TitleBlacklist::new(&blacklist_terms)
            .map_err(|e| ConfigError::InvalidValue(format!("title blacklist: {}", e)))?;

        let profanity =
            ProfanityClassifier::new(&primary, &secondary, config.moderation.max_matches)?;

        if config.sentiment.endpoints.is_empty() {
            warn!("No sentiment endpoints configured; every classification will fail");
        }
        let sentiment = SentimentClient::new(
            build_client(config.sentiment_timeout(), &config.sources.user_agent)?,
            config.sentiment.endpoints.clone(),
            config.sentiment.shared_key.clone(),
        );

        Ok(Self::new(
            VideoResolver::new(client.clone(), blacklist),
            TranscriptSource::new(
                client,
                &config.sources.youtube_base_url,
                config.sources.transcript_languages.clone(),
            ),
            LyricsResolver::from_config(config)?,
            profanity,
            sentiment,
            PipelineSettings {
                min_lyrics_length: config.moderation.min_lyrics_length,
                detection_timeout: config.detection_timeout(),
            },
        ))
    }

    /// Replace the search-based lyrics stage.
    pub fn with_lyrics_resolver(mut self, lyrics: LyricsResolver) -> Self {
        self.lyrics = lyrics;
        self
    }

    pub fn sentiment_endpoints(&self) -> usize {
        self.sentiment.endpoint_count()
    }

    pub async fn run(&self, url: &str) -> Outcome {
        self.run_inner(url, None).await
    }

    pub async fn run_with_progress(&self, url: &str, progress_tx: &mpsc::Sender<PipelineStage>) -> Outcome {
        self.run_inner(url, Some(progress_tx)).await
    }

    async fn run_inner(&self, url: &str, progress_tx: Option<&mpsc::Sender<PipelineStage>>) -> Outcome {
        let request_id = Uuid::new_v4();
        let span = info_span!("moderation", %request_id);
        async move {
            let start_time = Instant::now();
            info!("Received URL: {}", url);

            let outcome = self.stages(url, progress_tx).await;

            let duration = start_time.elapsed();
            info!(
                "Pipeline complete: code {} ({:.1}s)",
                outcome.code(),
                duration.as_secs_f32()
            );
            emit(progress_tx, PipelineStage::Complete { code: outcome.code(), duration }).await;
            outcome
        }
        .instrument(span)
        .await
    }

    async fn stages(&self, url: &str, progress_tx: Option<&mpsc::Sender<PipelineStage>>) -> Outcome {
        // 1. Resolve video page and title
        emit(progress_tx, PipelineStage::ResolvingVideo).await;
        let video = match self.video.resolve(url).await {
            Ok(video) => video,
            Err(e) => {
                emit(progress_tx, failed("video", &e)).await;
                let reason = match e {
                    VideoError::Blacklisted(term) => format!("blacklisted: {}", term),
                    other => other.to_string(),
                };
                return Outcome::TitleRejected { reason };
            }
        };
        emit(progress_tx, PipelineStage::VideoResolved { title: video.title.clone() }).await;

        // 2. Transcript, then search-based lyrics
        let mut document: Option<LyricsDocument> = None;
        if let Some(video_id) = video.video_id.as_deref() {
            emit(progress_tx, PipelineStage::FetchingTranscript).await;
            document = self.transcript.fetch(video_id).await;
        }
        if document.is_none() {
            info!("Trying external sources for lyrics...");
            emit(progress_tx, PipelineStage::SearchingLyrics).await;
            document = self.lyrics.resolve(&video.title).await;
        }

        let Some(document) = document else {
            warn!("Lyrics not found for link: {}", url);
            emit(progress_tx, failed("lyrics", "lyrics not found")).await;
            return Outcome::LyricsNotFound;
        };
        if document.text().chars().count() <= self.settings.min_lyrics_length {
            warn!("Lyrics too short ({} chars) for link: {}", document.text().len(), url);
            emit(progress_tx, failed("lyrics", "lyrics too short")).await;
            return Outcome::LyricsNotFound;
        }
        let source = document.source;
        emit(progress_tx, PipelineStage::LyricsFound { source }).await;

        // 3. Profanity gate
        emit(progress_tx, PipelineStage::CheckingProfanity).await;
        let cleaned = strip_emoji(document.text());
        let report = self.check_profanity(&cleaned).await;
        match report.verdict {
            ProfanityVerdict::UnsupportedLanguage => {
                info!("Language not supported");
                return Outcome::UnsupportedLanguage;
            }
            ProfanityVerdict::TooMany => {
                info!("Too many swear words detected, unable to analyze sentiment");
                return Outcome::TooManyProfanity { report };
            }
            ProfanityVerdict::FewOrNone => {}
        }

        // 4. Sentiment
        info!("Sentiment analysis initiated");
        emit(progress_tx, PipelineStage::ClassifyingSentiment).await;
        match self.sentiment.classify(&cleaned, &video.title).await {
            Ok(verdict) => Outcome::Classified { verdict, source },
            Err(e) => {
                emit(progress_tx, failed("sentiment", &e)).await;
                Outcome::BackendsExhausted
            }
        }
    }

    /// Detection and matching run on the blocking pool under a deadline;
    /// a timeout or panic counts as an unsupported language.
    async fn check_profanity(&self, text: &str) -> ProfanityReport {
        let classifier = Arc::clone(&self.profanity);
        let text = text.to_string();
        let task = tokio::task::spawn_blocking(move || classifier.classify(&text));

        match tokio::time::timeout(self.settings.detection_timeout, task).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                warn!("Profanity check failed: {}", e);
                ProfanityReport::unsupported()
            }
            Err(_) => {
                warn!(
                    "Language detection exceeded {:?}",
                    self.settings.detection_timeout
                );
                ProfanityReport::unsupported()
            }
        }
    }
}

fn failed(stage: &str, error: impl ToString) -> PipelineStage {
    PipelineStage::Failed {
        stage: stage.to_string(),
        error: error.to_string(),
    }
}

async fn emit(progress_tx: Option<&mpsc::Sender<PipelineStage>>, stage: PipelineStage) {
    if let Some(tx) = progress_tx {
        let _ = tx.send(stage).await;
    }
}
