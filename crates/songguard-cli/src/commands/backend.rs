use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use songguard_classifier::{
    api::{build_router, BackendState},
    BackendSettings, ClassifierBackend, GeminiClient,
};
use songguard_core::config::Config;

pub async fn run(bind: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let addr = bind.unwrap_or_else(|| config.server.backend_bind.clone());
    let backend_config = &config.backend;

    let model = GeminiClient::new(
        &backend_config.api_base_url,
        &backend_config.model,
        Duration::from_secs(backend_config.request_timeout_secs),
    )
    .context("Failed to create model client")?;

    let backend = ClassifierBackend::new(
        Arc::new(model),
        backend_config.credentials.clone(),
        BackendSettings {
            max_attempts: backend_config.max_attempts,
            retry_delay: Duration::from_millis(backend_config.retry_delay_ms),
        },
    );

    if backend.credential_count() == 0 {
        warn!("No model credentials configured; every request will fail");
    }
    if config.sentiment.shared_key.is_empty() {
        warn!("No shared key configured; every request will be rejected");
    }
    info!(
        "Backend ready: model {}, {} credential(s)",
        backend_config.model,
        backend.credential_count()
    );

    let app = build_router(BackendState::new(backend, &config.sentiment.shared_key));

    info!("Starting classifier backend on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(super::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Backend shutdown complete");
    Ok(())
}
