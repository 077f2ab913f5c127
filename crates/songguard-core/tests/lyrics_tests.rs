//! Search-based lyrics resolution against local engines and a lyrics site

mod common;

use std::time::{Duration, Instant};

use common::{SearchReply, Upstream, CLEAN_VERSE};
use songguard_core::extractors::SiteExtractor;
use songguard_core::search::StrategyKind;
use songguard_core::{LyricsSource, Outcome};

const ALL_STRATEGIES: [StrategyKind; 3] =
    [StrategyKind::Google, StrategyKind::Yahoo, StrategyKind::GoogleFresh];

#[tokio::test]
async fn fastest_candidate_wins_the_race() {
    let upstream = Upstream::start(1).await;
    let slow = upstream.add_page("slow", Duration::from_secs(3), Some("slow page words"));
    let fast = upstream.add_page("fast", Duration::ZERO, Some(CLEAN_VERSE));
    upstream.set_search(StrategyKind::Google, SearchReply::Links(vec![slow, fast]));
    let resolver = upstream.lyrics_resolver(&[StrategyKind::Google], Duration::from_secs(10));

    let started = Instant::now();
    let document = resolver.resolve("Artist - Song").await.expect("lyrics");

    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    assert_eq!(document.source, LyricsSource::Site(SiteExtractor::Tekstowo));
    assert!(document.text().starts_with("we walked along the river"));
}

#[tokio::test]
async fn failing_engine_falls_through_to_the_next() {
    let upstream = Upstream::start(1).await;
    let page = upstream.add_page("song", Duration::ZERO, Some(CLEAN_VERSE));
    upstream.set_search(StrategyKind::Google, SearchReply::Fail);
    upstream.set_search(StrategyKind::Yahoo, SearchReply::Links(vec![page]));
    let resolver = upstream.lyrics_resolver(&ALL_STRATEGIES, Duration::from_secs(10));

    let document = resolver.resolve("Artist - Song").await;

    assert!(document.is_some());
    assert_eq!(upstream.search_hits(StrategyKind::Google), 1);
    assert_eq!(upstream.search_hits(StrategyKind::Yahoo), 1);
    // resolved before the last engine
    assert_eq!(upstream.search_hits(StrategyKind::GoogleFresh), 0);
}

#[tokio::test]
async fn slow_link_is_abandoned_after_the_link_timeout() {
    let upstream = Upstream::start(1).await;
    let slow = upstream.add_page("slow", Duration::from_secs(5), Some(CLEAN_VERSE));
    upstream.set_search(StrategyKind::Google, SearchReply::Links(vec![slow]));
    let resolver = upstream.lyrics_resolver(&[StrategyKind::Google], Duration::from_millis(200));

    let started = Instant::now();
    let document = resolver.resolve("Artist - Song").await;

    assert!(document.is_none());
    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    assert_eq!(upstream.page_hits(), 1);
}

#[tokio::test]
async fn links_to_unknown_sites_are_not_fetched() {
    let upstream = Upstream::start(1).await;
    upstream.set_search(
        StrategyKind::Google,
        SearchReply::Links(vec![
            "https://genius.com/artist-song-lyrics".to_string(),
            format!("https://example.com/?next={}", upstream.lyrics_url("song")),
        ]),
    );
    let resolver = upstream.lyrics_resolver(&[StrategyKind::Google], Duration::from_secs(1));

    assert!(resolver.resolve("Artist - Song").await.is_none());
    assert_eq!(upstream.page_hits(), 0);
}

#[tokio::test]
async fn empty_pages_from_every_engine_need_review() {
    let upstream = Upstream::start(1).await;
    let links: Vec<String> = (0..5)
        .map(|i| upstream.add_page(&format!("empty-{}", i), Duration::ZERO, None))
        .collect();
    for kind in ALL_STRATEGIES {
        upstream.set_search(kind, SearchReply::Links(links.clone()));
    }
    let url = upstream.add_video("cccccccccc1", "Artist - Song", None);
    let pipeline = upstream
        .pipeline()
        .with_lyrics_resolver(upstream.lyrics_resolver(&ALL_STRATEGIES, Duration::from_secs(5)));

    let outcome = pipeline.run(&url).await;

    assert!(matches!(outcome, Outcome::LyricsNotFound), "{:?}", outcome);
    assert_eq!(outcome.code(), 1);
    assert_eq!(upstream.page_hits(), 15);
    for kind in ALL_STRATEGIES {
        assert_eq!(upstream.search_hits(kind), 1);
    }
    assert_eq!(upstream.backend_hits(), vec![0]);
}

#[tokio::test]
async fn site_lyrics_are_classified_when_no_transcript_exists() {
    let upstream = Upstream::start(1).await;
    let page = upstream.add_page("song", Duration::ZERO, Some(CLEAN_VERSE));
    upstream.set_search(StrategyKind::Google, SearchReply::Links(vec![page]));
    let url = upstream.add_video("cccccccccc2", "Artist - Song", None);
    let pipeline = upstream
        .pipeline()
        .with_lyrics_resolver(upstream.lyrics_resolver(&ALL_STRATEGIES, Duration::from_secs(5)));

    let outcome = pipeline.run(&url).await;

    match &outcome {
        Outcome::Classified { source, .. } => {
            assert_eq!(*source, LyricsSource::Site(SiteExtractor::Tekstowo))
        }
        other => panic!("expected classification, got {:?}", other),
    }
    assert_eq!(upstream.backend_hits(), vec![1]);
}
