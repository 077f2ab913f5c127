//! Moderation HTTP API

use crate::pipeline::{Outcome, Pipeline, CODE_REJECT};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            startup_time: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ModerationRequest {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    /// "Y" returns the full verdict instead of the bare code
    #[serde(rename = "LOGS", default)]
    pub logs: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub sentiment: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModerationResponse {
    fn rejected(error: impl Into<String>) -> Self {
        Self {
            sentiment: CODE_REJECT,
            error: Some(error.into()),
        }
    }
}

async fn moderate(
    State(state): State<AppState>,
    payload: Result<Json<ModerationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Malformed moderation request: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ModerationResponse::rejected("Invalid request body")),
            )
                .into_response();
        }
    };

    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ModerationResponse::rejected("No URL provided")),
        )
            .into_response();
    };
    let with_details = request.logs.as_deref() == Some("Y");

    let outcome = state.pipeline.run(url.trim()).await;
    let code = outcome.code();
    let message = outcome.error_message();

    match outcome {
        Outcome::Classified { verdict, .. } if with_details => Json(verdict).into_response(),
        Outcome::BackendsExhausted => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ModerationResponse::rejected(message.unwrap_or_default())),
        )
            .into_response(),
        _ => Json(ModerationResponse {
            sentiment: code,
            error: message.map(str::to_string),
        })
        .into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    Json(json!({
        "status": "ok",
        "module": "songguard",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime.num_seconds().max(0),
        "sentiment_endpoints": state.pipeline.sentiment_endpoints(),
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sentiment", post(moderate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
