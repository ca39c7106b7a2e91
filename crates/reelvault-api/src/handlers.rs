//! Request handlers: download, format listing, health.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use reelvault_core::Quality;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Absent format selects the metadata-only path.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Success envelope: `{success: true, ...body}`.
#[derive(Debug, Serialize)]
struct Success<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

fn ok<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

fn require_url(url: &Option<String>) -> Result<&str, ApiError> {
    match url.as_deref() {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(ApiError::bad_request("No URL provided.")),
    }
}

/// `POST /download`: ingest a URL, optionally at a quality tier.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = require_url(&request.url)?;

    match &request.format {
        None => {
            tracing::info!(url = %url, "Processing metadata request");
            let receipt = state
                .ingest
                .fetch_media_and_subtitles(url)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to process metadata."))?;
            tracing::info!(video_id = %receipt.video_id, "Metadata request finished");
            Ok(ok(receipt).into_response())
        }
        Some(token) => {
            let quality: Quality = token
                .parse()
                .map_err(|e: reelvault_core::quality::InvalidQuality| {
                    tracing::warn!(format = %token, "Invalid format requested");
                    ApiError::bad_request(e.to_string())
                })?;
            tracing::info!(url = %url, quality = %quality, "Processing download request");
            let receipt = state
                .ingest
                .fetch_and_store_video(url, quality)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to process the video."))?;
            tracing::info!(video_id = %receipt.video_id, "Download request finished");
            Ok(ok(receipt).into_response())
        }
    }
}

/// `POST /list`: enumerate available quality tiers for a URL.
pub async fn list_formats(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = require_url(&request.url)?;
    tracing::info!(url = %url, "Listing formats");
    let report = state
        .ingest
        .list_formats(url)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list formats."))?;
    Ok(ok(report))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "success": true, "message": "OK" }))
}
