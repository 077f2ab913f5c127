//! Local stand-in for the video platform, search engines, a lyrics site and
//! the classifier backends
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use songguard_core::lyrics::LyricsResolver;
use songguard_core::search::{SearchStrategy, StrategyKind};
use songguard_core::{config::Config, pipeline::Pipeline};

pub const SHARED_KEY: &str = "secret";

/// Lyrics-site host; pages are served locally through a resolver override.
pub const LYRICS_HOST: &str = "www.tekstowo.pl";

pub const CLEAN_VERSE: &str = "We walked along the river in the evening light, talking about the \
    summer we spent together and the friends we met along the way. Nothing could ever take away \
    the memories we made that year, and we keep singing while the stars come out tonight.";

pub const SPANISH_VERSE: &str = "Caminamos junto al río bajo la luz de la tarde, hablando del \
    verano que pasamos juntos y de los amigos que conocimos en el camino. Nada podrá borrar los \
    recuerdos que hicimos aquel año, y seguimos cantando mientras salen las estrellas.";

/// The clean verse followed by `count` occurrences of an English lexicon term.
pub fn verse_with_profanity(count: usize) -> String {
    let mut text = CLEAN_VERSE.to_string();
    for _ in 0..count {
        text.push_str(" damn");
    }
    text
}

#[derive(Clone)]
pub struct FakeVideo {
    pub title: String,
    pub transcript: Option<String>,
    /// Serve the transcript only as an auto-generated track
    pub auto_generated: bool,
}

/// What a fake search engine answers with
#[derive(Clone)]
pub enum SearchReply {
    Fail,
    Links(Vec<String>),
}

#[derive(Clone)]
pub struct LyricsPage {
    pub delay: Duration,
    /// `None` serves the lyrics container without any text
    pub text: Option<String>,
}

fn engine_name(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Google => "google",
        StrategyKind::Yahoo => "yahoo",
        StrategyKind::GoogleFresh => "fresh",
    }
}

struct Inner {
    addr: std::net::SocketAddr,
    base_url: String,
    videos: Mutex<HashMap<String, FakeVideo>>,
    backend_hits: Vec<AtomicUsize>,
    failing: Mutex<HashSet<usize>>,
    null_verdicts: Mutex<HashSet<usize>>,
    search_replies: Mutex<HashMap<String, SearchReply>>,
    search_hits: Mutex<HashMap<String, usize>>,
    pages: Mutex<HashMap<String, LyricsPage>>,
    page_hits: AtomicUsize,
    received: Mutex<Vec<Value>>,
    _word_lists: TempDir,
    config: Config,
}

#[derive(Clone)]
pub struct Upstream {
    inner: Arc<Inner>,
}

impl Upstream {
    /// Bind a local server with `backends` classifier endpoints.
    pub async fn start(backends: usize) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("lexicon_pl.txt");
        let secondary = dir.path().join("lexicon_en.txt");
        let blacklist = dir.path().join("title_blacklist.txt");
        std::fs::write(&primary, "kurwa\nchuj\n").unwrap();
        std::fs::write(&secondary, "damn\nshit\nhell\nass\n").unwrap();
        std::fs::write(&blacklist, "karaoke\n").unwrap();

        let mut config = Config::default();
        config.sources.youtube_base_url = base_url.clone();
        config.sources.fetch_timeout_secs = 5;
        config.search.strategies = Vec::new();
        config.moderation.primary_lexicon = primary;
        config.moderation.secondary_lexicon = secondary;
        config.moderation.title_blacklist = blacklist;
        config.sentiment.endpoints = (0..backends)
            .map(|i| format!("{}/backend/{}", base_url, i))
            .collect();
        config.sentiment.shared_key = SHARED_KEY.to_string();
        config.sentiment.request_timeout_secs = 5;

        let upstream = Self {
            inner: Arc::new(Inner {
                addr,
                base_url,
                videos: Mutex::new(HashMap::new()),
                backend_hits: (0..backends).map(|_| AtomicUsize::new(0)).collect(),
                failing: Mutex::new(HashSet::new()),
                null_verdicts: Mutex::new(HashSet::new()),
                search_replies: Mutex::new(HashMap::new()),
                search_hits: Mutex::new(HashMap::new()),
                pages: Mutex::new(HashMap::new()),
                page_hits: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
                _word_lists: dir,
                config,
            }),
        };

        let app = Router::new()
            .route("/watch", get(watch))
            .route("/timedtext", get(timed_text))
            .route("/engines/:engine/search", get(search))
            .route("/lyrics/:slug", get(lyrics_page))
            .route("/backend/:idx", post(backend))
            .with_state(upstream.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        upstream
    }

    pub fn config(&self) -> Config {
        self.inner.config.clone()
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(&self.inner.config).unwrap()
    }

    pub fn add_video(&self, id: &str, title: &str, transcript: Option<&str>) -> String {
        self.insert(
            id,
            FakeVideo {
                title: title.to_string(),
                transcript: transcript.map(str::to_string),
                auto_generated: false,
            },
        )
    }

    pub fn insert(&self, id: &str, video: FakeVideo) -> String {
        self.inner.videos.lock().unwrap().insert(id.to_string(), video);
        self.watch_url(id)
    }

    pub fn watch_url(&self, id: &str) -> String {
        format!("{}/watch?v={}", self.inner.base_url, id)
    }

    pub fn fail_backend(&self, idx: usize) {
        self.inner.failing.lock().unwrap().insert(idx);
    }

    /// Answer with a JSON `null` instead of a verdict.
    pub fn null_backend(&self, idx: usize) {
        self.inner.null_verdicts.lock().unwrap().insert(idx);
    }

    pub fn set_search(&self, kind: StrategyKind, reply: SearchReply) {
        self.inner
            .search_replies
            .lock()
            .unwrap()
            .insert(engine_name(kind).to_string(), reply);
    }

    pub fn search_hits(&self, kind: StrategyKind) -> usize {
        self.inner
            .search_hits
            .lock()
            .unwrap()
            .get(engine_name(kind))
            .copied()
            .unwrap_or(0)
    }

    /// Serve a lyrics page and return its public URL.
    pub fn add_page(&self, slug: &str, delay: Duration, text: Option<&str>) -> String {
        self.inner.pages.lock().unwrap().insert(
            slug.to_string(),
            LyricsPage {
                delay,
                text: text.map(str::to_string),
            },
        );
        self.lyrics_url(slug)
    }

    pub fn lyrics_url(&self, slug: &str) -> String {
        format!("http://{}:{}/lyrics/{}", LYRICS_HOST, self.inner.addr.port(), slug)
    }

    pub fn page_hits(&self) -> usize {
        self.inner.page_hits.load(Ordering::SeqCst)
    }

    /// Resolver querying the local engines in `order`. Lyrics-site requests
    /// resolve to this server.
    pub fn lyrics_resolver(&self, order: &[StrategyKind], link_timeout: Duration) -> LyricsResolver {
        let strategies = order
            .iter()
            .map(|&kind| {
                let base = format!("{}/engines/{}", self.inner.base_url, engine_name(kind));
                SearchStrategy::new(kind, &base, reqwest::Client::new())
            })
            .collect();
        let page_client = reqwest::Client::builder()
            .resolve(LYRICS_HOST, self.inner.addr)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        LyricsResolver::new(strategies, page_client, link_timeout, 5)
    }

    pub fn backend_hits(&self) -> Vec<usize> {
        self.inner
            .backend_hits
            .iter()
            .map(|hits| hits.load(Ordering::SeqCst))
            .collect()
    }

    pub fn received(&self) -> Vec<Value> {
        self.inner.received.lock().unwrap().clone()
    }
}

async fn watch(State(upstream): State<Upstream>, Query(query): Query<HashMap<String, String>>) -> Response {
    let Some(id) = query.get("v") else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(video) = upstream.inner.videos.lock().unwrap().get(id).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let tracks = match &video.transcript {
        Some(_) => {
            let kind = if video.auto_generated { r#","kind":"asr""# } else { "" };
            format!(
                r#"[{{"baseUrl":"{}/timedtext?v={}","languageCode":"en"{}}}]"#,
                upstream.inner.base_url, id, kind
            )
        }
        None => "[]".to_string(),
    };

    Html(format!(
        r#"<html><head><title>{} - YouTube</title></head><body><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":{}}}}}}};</script></body></html>"#,
        video.title, tracks
    ))
    .into_response()
}

async fn timed_text(State(upstream): State<Upstream>, Query(query): Query<HashMap<String, String>>) -> Response {
    let transcript = query
        .get("v")
        .and_then(|id| upstream.inner.videos.lock().unwrap().get(id).cloned())
        .and_then(|video| video.transcript);
    let Some(transcript) = transcript else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let body: String = transcript
        .split(". ")
        .enumerate()
        .map(|(i, line)| format!(r#"<text start="{}" dur="2">{}</text>"#, i * 2, line))
        .collect();
    format!(r#"<?xml version="1.0" encoding="utf-8" ?><transcript>{}</transcript>"#, body).into_response()
}

async fn backend(
    State(upstream): State<Upstream>,
    Path(idx): Path<usize>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(hits) = upstream.inner.backend_hits.get(idx) {
        hits.fetch_add(1, Ordering::SeqCst);
    }
    let authorized = body["key"] == SHARED_KEY;
    upstream.inner.received.lock().unwrap().push(body);

    if upstream.inner.failing.lock().unwrap().contains(&idx) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable").into_response();
    }
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if upstream.inner.null_verdicts.lock().unwrap().contains(&idx) {
        return Json(Value::Null).into_response();
    }

    Json(json!({
        "sentiment": 0,
        "sentiment_score": 0.5,
        "confidence": 0.9,
        "explanation": "cheerful"
    }))
    .into_response()
}

async fn search(State(upstream): State<Upstream>, Path(engine): Path<String>) -> Response {
    *upstream
        .inner
        .search_hits
        .lock()
        .unwrap()
        .entry(engine.clone())
        .or_insert(0) += 1;

    let reply = upstream.inner.search_replies.lock().unwrap().get(&engine).cloned();
    let links = match reply {
        Some(SearchReply::Fail) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Some(SearchReply::Links(links)) => links,
        None => Vec::new(),
    };

    let anchors: String = links
        .iter()
        .map(|link| {
            let encoded = urlencoding::encode(link);
            if engine == "yahoo" {
                format!(
                    r#"<a href="https://r.search.yahoo.com/_ylt=x/RU={}/RK=2/RS=y-">{}</a>"#,
                    encoded, link
                )
            } else {
                format!(r#"<a href="/url?q={}&amp;sa=U">{}</a>"#, encoded, link)
            }
        })
        .collect();
    Html(format!("<html><body>{}</body></html>", anchors)).into_response()
}

async fn lyrics_page(State(upstream): State<Upstream>, Path(slug): Path<String>) -> Response {
    upstream.inner.page_hits.fetch_add(1, Ordering::SeqCst);
    let Some(page) = upstream.inner.pages.lock().unwrap().get(&slug).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    tokio::time::sleep(page.delay).await;
    Html(format!(
        r#"<html><body><div class="song-text"><div class="inner-text">{}</div></div></body></html>"#,
        page.text.unwrap_or_default()
    ))
    .into_response()
}
