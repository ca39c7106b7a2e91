//! Application setup: store, extractor, ingestion service, and routes.

pub mod server;

use crate::handlers;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use reelvault_core::Config;
use reelvault_extract::YtDlpExtractor;
use reelvault_ingest::IngestService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Wire up the object store, extractor, and ingestion service, and build
/// the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let store = reelvault_storage::create_store(&config)
        .await
        .context("Failed to create object store")?;

    let extractor = Arc::new(YtDlpExtractor::new(config.ytdlp_path.clone()));

    tokio::fs::create_dir_all(&config.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory {}",
                config.download_dir.display()
            )
        })?;

    let ingest = Arc::new(IngestService::new(
        store,
        extractor,
        config.download_dir.clone(),
    ));

    let state = Arc::new(AppState { config, ingest });
    let router = build_router(state.clone());
    Ok((state, router))
}

/// Router over an already-constructed state; used directly by tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/download", post(handlers::download))
        .route("/list", post(handlers::list_formats))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
