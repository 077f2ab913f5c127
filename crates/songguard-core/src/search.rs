//! Search-engine backends used to discover lyrics pages

use crate::error::FetchError;
use crate::extractors::SiteExtractor;
use crate::fetch::fetch_text;
use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra terms steering Yahoo towards the supported lyrics sites.
const YAHOO_SITE_HINTS: &str = "lyrics tekstowo groove teksciory AZLyrics";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Google through the persistent, cookie-carrying session
    Google,
    /// Yahoo with site hints, no session
    Yahoo,
    /// Google with a cookie-less client
    GoogleFresh,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Google => "google",
            StrategyKind::Yahoo => "yahoo",
            StrategyKind::GoogleFresh => "google-fresh",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "google" => Some(StrategyKind::Google),
            "yahoo" => Some(StrategyKind::Yahoo),
            "google-fresh" => Some(StrategyKind::GoogleFresh),
            _ => None,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One search backend plus the client it queries with.
#[derive(Debug, Clone)]
pub struct SearchStrategy {
    pub kind: StrategyKind,
    base_url: String,
    client: Client,
}

impl SearchStrategy {
    pub fn new(kind: StrategyKind, base_url: &str, client: Client) -> Self {
        Self {
            kind,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn query_url(&self, title: &str) -> String {
        match self.kind {
            StrategyKind::Google | StrategyKind::GoogleFresh => format!(
                "{}/search?q={}",
                self.base_url,
                urlencoding::encode(&format!("{} lyrics", title))
            ),
            StrategyKind::Yahoo => format!(
                "{}/search?p={}",
                self.base_url,
                urlencoding::encode(&format!("{} {}", title, YAHOO_SITE_HINTS))
            ),
        }
    }

    /// Candidate lyrics-page links for `title`, at most `limit`.
    pub async fn candidates(&self, title: &str, limit: usize) -> Result<Vec<String>, FetchError> {
        let html = fetch_text(&self.client, &self.query_url(title)).await?;
        let links = match self.kind {
            StrategyKind::Google | StrategyKind::GoogleFresh => google_links(&html),
            StrategyKind::Yahoo => yahoo_links(&html),
        };
        let links = keep_candidates(links, limit);
        debug!("{} candidate links from {}", links.len(), self.kind);
        Ok(links)
    }
}

fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Links from a Google result page, unwrapping `/url?q=` redirects.
pub fn google_links(html: &str) -> Vec<String> {
    anchor_hrefs(html)
        .into_iter()
        .map(|href| match href.strip_prefix("/url?q=") {
            Some(rest) => {
                let target = rest.split('&').next().unwrap_or_default();
                urlencoding::decode(target)
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| target.to_string())
            }
            None => href,
        })
        .collect()
}

/// Links from a Yahoo result page, decoded from their `RU=` segment.
pub fn yahoo_links(html: &str) -> Vec<String> {
    anchor_hrefs(html)
        .iter()
        .filter_map(|href| {
            href.split('/')
                .find_map(|part| part.strip_prefix("RU="))
                .and_then(|encoded| urlencoding::decode(encoded).ok())
                .map(|s| s.into_owned())
        })
        .collect()
}

/// Keep links served by a known extractor, de-duplicated, first `limit`.
pub fn keep_candidates(links: Vec<String>, limit: usize) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for link in links {
        if kept.len() == limit {
            break;
        }
        if SiteExtractor::for_url(&link).is_some() && !kept.contains(&link) {
            kept.push(link);
        }
    }
    kept
}

#[derive(Debug, Deserialize)]
struct StoredCookie {
    name: String,
    value: String,
}

/// Cookie jar for the persistent search session, seeded from a JSON file.
pub fn session_jar(cookies_file: Option<&Path>, base_url: &str) -> Arc<Jar> {
    let jar = Arc::new(Jar::default());
    let (Some(path), Ok(url)) = (cookies_file, base_url.parse::<Url>()) else {
        return jar;
    };

    let cookies: Vec<StoredCookie> = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(cookies) => cookies,
        Err(e) => {
            warn!("Could not load cookies from {}: {}", path.display(), e);
            return jar;
        }
    };

    for cookie in &cookies {
        jar.add_cookie_str(&format!("{}={}", cookie.name, cookie.value), &url);
    }
    info!("Loaded {} search session cookies", cookies.len());
    jar
}

/// Client for the persistent session: keeps cookies for the process lifetime.
pub fn session_client(
    jar: Arc<Jar>,
    timeout: Duration,
    user_agent: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .cookie_provider(jar)
        .build()
}
