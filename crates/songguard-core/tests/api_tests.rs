//! Moderation API tests

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{Upstream, CLEAN_VERSE};
use songguard_core::api::{build_router, AppState};

fn moderation_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/sentiment")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_url_is_a_bad_request() {
    let upstream = Upstream::start(1).await;
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app.oneshot(moderation_request(json!({ "LOGS": "Y" }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["sentiment"], 2);
    assert_eq!(body["error"], "No URL provided");
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let upstream = Upstream::start(1).await;
    let app = build_router(AppState::new(upstream.pipeline()));

    let request = Request::builder()
        .method("POST")
        .uri("/sentiment")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["sentiment"], 2);
}

#[tokio::test]
async fn classified_song_returns_bare_code() {
    let upstream = Upstream::start(1).await;
    let url = upstream.add_video("bbbbbbbbbb1", "Artist - Song", Some(CLEAN_VERSE));
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app.oneshot(moderation_request(json!({ "URL": url }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "sentiment": 0 }));
}

#[tokio::test]
async fn logs_flag_returns_full_verdict() {
    let upstream = Upstream::start(1).await;
    let url = upstream.add_video("bbbbbbbbbb2", "Artist - Song", Some(CLEAN_VERSE));
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app
        .oneshot(moderation_request(json!({ "URL": url, "LOGS": "Y" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sentiment"], 0);
    assert_eq!(body["explanation"], "cheerful");
    assert!(body["confidence"].is_number());
}

#[tokio::test]
async fn rejection_carries_reason() {
    let upstream = Upstream::start(1).await;
    let url = upstream.add_video("bbbbbbbbbb3", "Song karaoke", Some(CLEAN_VERSE));
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app.oneshot(moderation_request(json!({ "URL": url }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "sentiment": 2, "error": "Title issue" }));
}

#[tokio::test]
async fn missing_lyrics_reports_review_code() {
    let upstream = Upstream::start(1).await;
    let url = upstream.add_video("bbbbbbbbbb4", "Artist - Song", None);
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app.oneshot(moderation_request(json!({ "URL": url }))).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body, json!({ "sentiment": 1, "error": "Lyrics issue" }));
}

#[tokio::test]
async fn exhausted_backends_are_service_unavailable() {
    let upstream = Upstream::start(2).await;
    upstream.fail_backend(0);
    upstream.fail_backend(1);
    let url = upstream.add_video("bbbbbbbbbb5", "Artist - Song", Some(CLEAN_VERSE));
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app.oneshot(moderation_request(json!({ "URL": url }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["sentiment"], 2);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_reports_endpoints() {
    let upstream = Upstream::start(3).await;
    let app = build_router(AppState::new(upstream.pipeline()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sentiment_endpoints"], 3);
}
