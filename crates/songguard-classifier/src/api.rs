//! HTTP surface of a backend instance

use crate::backend::ClassifierBackend;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

#[derive(Clone)]
pub struct BackendState {
    pub backend: Arc<ClassifierBackend>,
    /// Secret the orchestrator must present with every request
    pub shared_key: Arc<str>,
    pub startup_time: DateTime<Utc>,
}

impl BackendState {
    pub fn new(backend: ClassifierBackend, shared_key: &str) -> Self {
        Self {
            backend: Arc::new(backend),
            shared_key: Arc::from(shared_key),
            startup_time: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub lyrics: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key: String,
}

async fn classify(State(state): State<BackendState>, Json(req): Json<ClassifyRequest>) -> Response {
    if state.shared_key.is_empty() || req.key != *state.shared_key {
        warn!("Rejected classify request with invalid key");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid key" }))).into_response();
    }

    match state.backend.classify(&req.lyrics, &req.title).await {
        Ok(verdict) => Json(verdict).into_response(),
        Err(e) => {
            error!("Classification failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "Failed to communicate with the classifier after multiple attempts" })),
            )
                .into_response()
        }
    }
}

async fn health(State(state): State<BackendState>) -> Json<serde_json::Value> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    Json(json!({
        "status": "ok",
        "module": "songguard-classifier",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime.num_seconds().max(0),
        "credentials": state.backend.credential_count(),
    }))
}

pub fn build_router(state: BackendState) -> Router {
    Router::new()
        .route("/sentiment", post(classify))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
