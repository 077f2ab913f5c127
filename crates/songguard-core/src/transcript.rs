//! Manually authored caption tracks as a lyrics source

use crate::fetch::{fetch_text, preview};
use crate::lyrics::{LyricsDocument, LyricsSource};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info};

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `asr` marks an automatically generated track
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_manual(&self) -> bool {
        self.kind.as_deref() != Some("asr")
    }
}

/// Caption tracks embedded in a watch page's player response.
pub fn caption_tracks(html: &str) -> Vec<CaptionTrack> {
    let Some(pos) = html.find(CAPTION_TRACKS_KEY) else {
        return Vec::new();
    };
    let rest = &html[pos + CAPTION_TRACKS_KEY.len()..];
    serde_json::Deserializer::from_str(rest)
        .into_iter::<Vec<CaptionTrack>>()
        .next()
        .and_then(Result::ok)
        .unwrap_or_default()
}

/// First manual track in language preference order.
pub fn pick_manual_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        tracks
            .iter()
            .find(|t| t.is_manual() && t.language_code == *lang)
    })
}

/// Join the fragments of a timed-text document with single spaces.
pub fn timed_text_to_plain(xml: &str) -> String {
    let fragment = Html::parse_fragment(xml);
    let Ok(selector) = Selector::parse("text") else {
        return String::new();
    };
    fragment
        .select(&selector)
        .map(|el| decode_entities(&el.text().collect::<String>()))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// Timed-text bodies are frequently entity-encoded twice.
fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub struct TranscriptSource {
    client: Client,
    base_url: String,
    languages: Vec<String>,
}

impl TranscriptSource {
    pub fn new(client: Client, base_url: &str, languages: Vec<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            languages,
        }
    }

    /// Manual transcript for `video_id`, or `None` on any failure.
    pub async fn fetch(&self, video_id: &str) -> Option<LyricsDocument> {
        let watch_url = format!("{}/watch?v={}", self.base_url, video_id);
        let html = match fetch_text(&self.client, &watch_url).await {
            Ok(html) => html,
            Err(e) => {
                info!("No manual transcript available for {}: {}", video_id, e);
                return None;
            }
        };

        let tracks = caption_tracks(&html);
        debug!("{} caption tracks for {}", tracks.len(), video_id);
        let Some(track) = pick_manual_track(&tracks, &self.languages) else {
            info!("No manual transcript available for {}", video_id);
            return None;
        };

        let xml = match fetch_text(&self.client, &track.base_url).await {
            Ok(xml) => xml,
            Err(e) => {
                info!("Failed to fetch transcript for {}: {}", video_id, e);
                return None;
            }
        };

        let text = timed_text_to_plain(&xml);
        if text.is_empty() {
            return None;
        }
        info!(
            "Manual transcript found - video_id:{}, language:{} {}",
            video_id,
            track.language_code,
            preview(&text, 50)
        );
        Some(LyricsDocument::new(text, LyricsSource::Transcript))
    }
}
