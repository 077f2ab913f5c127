use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use songguard_core::{
    api::{build_router, AppState},
    config::Config,
    pipeline::Pipeline,
};

pub async fn run(bind: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());

    let pipeline = Pipeline::from_config(&config).context("Failed to build moderation pipeline")?;
    info!(
        "Pipeline ready: {} sentiment endpoint(s), strategies {:?}",
        pipeline.sentiment_endpoints(),
        config.search.strategies
    );

    let app = build_router(AppState::new(pipeline));

    info!("Starting moderation API on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(super::shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
