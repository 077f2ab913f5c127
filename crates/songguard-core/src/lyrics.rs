//! Lyrics discovery across ordered search strategies

use crate::config::Config;
use crate::error::{FetchError, SongGuardError};
use crate::extractors::SiteExtractor;
use crate::fetch::{build_client, fetch_text_within, preview};
use crate::search::{session_client, session_jar, SearchStrategy, StrategyKind};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsSource {
    Transcript,
    Site(SiteExtractor),
}

impl std::fmt::Display for LyricsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LyricsSource::Transcript => write!(f, "transcript"),
            LyricsSource::Site(site) => write!(f, "{}", site),
        }
    }
}

/// Lyrics owned by one request. Text is lower-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsDocument {
    text: String,
    pub source: LyricsSource,
}

impl LyricsDocument {
    pub fn new(text: impl AsRef<str>, source: LyricsSource) -> Self {
        Self {
            text: text.as_ref().to_lowercase(),
            source,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

pub struct LyricsResolver {
    strategies: Vec<SearchStrategy>,
    page_client: Client,
    link_timeout: Duration,
    max_candidates: usize,
}

impl LyricsResolver {
    pub fn new(
        strategies: Vec<SearchStrategy>,
        page_client: Client,
        link_timeout: Duration,
        max_candidates: usize,
    ) -> Self {
        Self {
            strategies,
            page_client,
            link_timeout,
            max_candidates,
        }
    }

    /// Build the configured strategy list. Unknown strategy names are skipped.
    pub fn from_config(config: &Config) -> Result<Self, SongGuardError> {
        let timeout = config.fetch_timeout();
        let user_agent = config.sources.user_agent.as_str();
        let page_client = build_client(timeout, user_agent)?;

        let mut strategies = Vec::new();
        for name in &config.search.strategies {
            let Some(kind) = StrategyKind::parse(name) else {
                warn!("Ignoring unknown search strategy: {}", name);
                continue;
            };
            let strategy = match kind {
                StrategyKind::Google => {
                    let jar = session_jar(
                        config.sources.cookies_file.as_deref(),
                        &config.search.google_base_url,
                    );
                    let client = session_client(jar, timeout, user_agent)?;
                    SearchStrategy::new(kind, &config.search.google_base_url, client)
                }
                StrategyKind::GoogleFresh => SearchStrategy::new(
                    kind,
                    &config.search.google_base_url,
                    build_client(timeout, user_agent)?,
                ),
                StrategyKind::Yahoo => SearchStrategy::new(
                    kind,
                    &config.search.yahoo_base_url,
                    build_client(timeout, user_agent)?,
                ),
            };
            strategies.push(strategy);
        }

        Ok(Self::new(
            strategies,
            page_client,
            config.link_timeout(),
            config.sources.max_candidates,
        ))
    }

    /// Try each strategy in order; the first one yielding lyrics wins.
    pub async fn resolve(&self, title: &str) -> Option<LyricsDocument> {
        for strategy in &self.strategies {
            let links = match strategy.candidates(title, self.max_candidates).await {
                Ok(links) => links,
                Err(e) => {
                    warn!("Search via {} failed for '{}': {}", strategy.kind, title, e);
                    continue;
                }
            };

            if let Some(document) = self.race(&links).await {
                info!("Lyrics retrieved from external source - {}", strategy.kind);
                return Some(document);
            }
            info!("No lyrics found via {} for {}", strategy.kind, title);
        }
        None
    }

    /// Extract every candidate concurrently; first non-empty result wins and
    /// the remaining extractions are dropped.
    async fn race(&self, links: &[String]) -> Option<LyricsDocument> {
        let mut pending: FuturesUnordered<_> = links
            .iter()
            .filter_map(|link| SiteExtractor::for_url(link).map(|site| (link, site)))
            .map(|(link, site)| self.extract_link(link, site))
            .collect();

        while let Some(result) = pending.next().await {
            if let Some(document) = result {
                return Some(document);
            }
        }
        None
    }

    async fn extract_link(&self, link: &str, site: SiteExtractor) -> Option<LyricsDocument> {
        let html = match fetch_text_within(&self.page_client, link, self.link_timeout).await {
            Ok(html) => html,
            Err(FetchError::Timeout(limit)) => {
                warn!("Timeout after {:?} while scraping lyrics from {}", limit, link);
                return None;
            }
            Err(e) => {
                warn!("Error scraping lyrics from {}: {}", link, e);
                return None;
            }
        };

        match site.extract(&html) {
            Some(text) => {
                info!("Lyrics found on {}: {}", site, preview(&text, 50));
                Some(LyricsDocument::new(text, LyricsSource::Site(site)))
            }
            None => {
                debug!("No lyrics block on {}", link);
                None
            }
        }
    }
}
