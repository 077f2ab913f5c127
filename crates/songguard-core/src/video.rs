//! Video page resolution: identifier, cleaned title, title blacklist

use crate::error::VideoError;
use crate::fetch::fetch_text;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{info, warn};

/// A resolved request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub url: String,
    /// 11-character platform id; `None` disables the transcript stage
    pub video_id: Option<String>,
    pub title: String,
}

/// Whole-word, case-insensitive match against a fixed term list.
#[derive(Debug, Clone, Default)]
pub struct TitleBlacklist {
    pattern: Option<Regex>,
}

impl TitleBlacklist {
    pub fn new<I, S>(terms: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(&t))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// First blacklisted term found in `title`.
    pub fn find<'t>(&self, title: &'t str) -> Option<&'t str> {
        self.pattern
            .as_ref()
            .and_then(|p| p.find(title))
            .map(|m| m.as_str())
    }
}

fn annotation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[.*?\]|\(.*?\)| - YouTube|&amp;").expect("static regex")
    })
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:v=|youtu\.be/|shorts/)([A-Za-z0-9_-]{11})").expect("static regex")
    })
}

/// Strip bracketed annotations, platform suffix and entities from a page title.
pub fn clean_title(raw: &str) -> String {
    let head = raw.split('|').next().unwrap_or_default();
    annotation_pattern().replace_all(head, "").trim().to_string()
}

/// Extract the 11-character video id from a URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_pattern()
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text of the page's `<title>` element, if any.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .filter(|t| !t.trim().is_empty())
}

pub struct VideoResolver {
    client: Client,
    blacklist: TitleBlacklist,
}

impl VideoResolver {
    pub fn new(client: Client, blacklist: TitleBlacklist) -> Self {
        Self { client, blacklist }
    }

    pub async fn resolve(&self, url: &str) -> Result<VideoReference, VideoError> {
        let html = fetch_text(&self.client, url).await.map_err(|e| {
            warn!("Error fetching video page {}: {}", url, e);
            VideoError::PageFetchFailed(e)
        })?;

        let raw_title = page_title(&html).ok_or(VideoError::TitleMissing)?;
        let title = clean_title(&raw_title);
        if title.is_empty() {
            return Err(VideoError::TitleMissing);
        }

        if let Some(term) = self.blacklist.find(&title) {
            info!("Title contains blacklisted word: {}", title);
            return Err(VideoError::Blacklisted(term.to_string()));
        }

        let video_id = extract_video_id(url);
        if video_id.is_none() {
            warn!("No video id in {}", url);
        }

        Ok(VideoReference {
            url: url.to_string(),
            video_id,
            title,
        })
    }
}
