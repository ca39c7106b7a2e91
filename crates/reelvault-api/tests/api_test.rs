//! Router-level tests: validation, response shaping, error containment.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use reelvault_api::setup::build_router;
use reelvault_api::AppState;
use reelvault_core::{Config, FormatInfo, MediaInfo, ProbeInfo, StorageBackend};
use reelvault_extract::{ExtractError, ExtractRequest, Extraction, Extractor};
use reelvault_ingest::IngestService;
use reelvault_storage::LocalStore;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct FakeExtractor;

#[async_trait]
impl Extractor for FakeExtractor {
    async fn probe(&self, _url: &str) -> Result<ProbeInfo, ExtractError> {
        Ok(ProbeInfo {
            id: Some("abc12345678".to_string()),
            title: "A test video".to_string(),
            thumbnail: None,
            formats: vec![FormatInfo {
                format_id: Some("22".to_string()),
                height: Some(720),
            }],
        })
    }

    async fn extract(
        &self,
        _url: &str,
        request: &ExtractRequest,
    ) -> Result<Extraction, ExtractError> {
        let media_path = if request.skip_download {
            None
        } else {
            let path = request.output_base.with_extension("mp4");
            tokio::fs::write(&path, b"media").await?;
            Some(path)
        };
        Ok(Extraction {
            info: MediaInfo {
                id: Some("abc12345678".to_string()),
                title: "A test video".to_string(),
                description: String::new(),
                thumbnail: None,
            },
            media_path,
            subtitle_path: None,
        })
    }
}

struct BrokenExtractor;

#[async_trait]
impl Extractor for BrokenExtractor {
    async fn probe(&self, _url: &str) -> Result<ProbeInfo, ExtractError> {
        Err(ExtractError::Failed("unsupported site".to_string()))
    }

    async fn extract(
        &self,
        _url: &str,
        _request: &ExtractRequest,
    ) -> Result<Extraction, ExtractError> {
        Err(ExtractError::Failed("unsupported site".to_string()))
    }
}

fn test_config(download_dir: PathBuf) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        public_base_url: None,
        local_storage_path: None,
        local_storage_base_url: None,
        download_dir,
        ytdlp_path: "yt-dlp".to_string(),
    }
}

/// Router backed by a local store and the given extractor. The returned
/// TempDirs keep the scratch space alive for the test's duration.
async fn test_router(extractor: Arc<dyn Extractor>) -> (Router, TempDir, TempDir) {
    let store_dir = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();

    let store = Arc::new(
        LocalStore::new(store_dir.path(), "https://cdn.example.com".to_string())
            .await
            .unwrap(),
    );
    let ingest = Arc::new(IngestService::new(store, extractor, workdir.path()));
    let state = Arc::new(AppState {
        config: test_config(workdir.path().to_path_buf()),
        ingest,
    });
    (build_router(state), store_dir, workdir)
}

async fn post_json(router: Router, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(FakeExtractor)).await;
    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "OK");
}

#[tokio::test]
async fn missing_url_is_rejected_before_any_work() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(BrokenExtractor)).await;
    let (status, json) = post_json(router, "/download", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "No URL provided.");
}

#[tokio::test]
async fn invalid_format_names_the_offending_value() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(BrokenExtractor)).await;
    let (status, json) = post_json(
        router,
        "/download",
        serde_json::json!({"url": "https://youtu.be/abc12345678", "format": "ultra"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("ultra"));
    assert!(message.contains("low, medium, high, max"));
}

#[tokio::test]
async fn download_returns_wrapped_receipt() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(FakeExtractor)).await;
    let (status, json) = post_json(
        router,
        "/download",
        serde_json::json!({"url": "https://www.youtube.com/watch?v=abc12345678", "format": "high"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["video_id"], "abc12345678");
    assert_eq!(json["provider"], "youtube");
    assert_eq!(json["quality"], "high");
    assert_eq!(
        json["urls"]["video"],
        "https://cdn.example.com/youtube/abc12345678-high.mp4"
    );
}

#[tokio::test]
async fn metadata_path_is_selected_when_format_is_absent() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(FakeExtractor)).await;
    let (status, json) = post_json(
        router,
        "/download",
        serde_json::json!({"url": "https://www.youtube.com/watch?v=abc12345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["urls"].get("video").is_none());
    assert_eq!(
        json["urls"]["info"],
        "https://cdn.example.com/youtube/abc12345678.json"
    );
}

#[tokio::test]
async fn extraction_failure_is_contained_to_a_generic_message() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(BrokenExtractor)).await;
    let (status, json) = post_json(
        router,
        "/download",
        serde_json::json!({"url": "https://youtu.be/abc12345678", "format": "max"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    // Internal detail must not leak.
    assert_eq!(json["error"], "Failed to process the video.");
}

#[tokio::test]
async fn metadata_failure_reports_the_metadata_message() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(BrokenExtractor)).await;
    let (status, json) = post_json(
        router,
        "/download",
        serde_json::json!({"url": "https://youtu.be/abc12345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to process metadata.");
}

#[tokio::test]
async fn list_failure_reports_the_listing_message() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(BrokenExtractor)).await;
    let (status, json) = post_json(
        router,
        "/list",
        serde_json::json!({"url": "https://youtu.be/abc12345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to list formats.");
}

#[tokio::test]
async fn list_reports_available_tiers() {
    let (router, _store_dir, _workdir) = test_router(Arc::new(FakeExtractor)).await;
    let (status, json) = post_json(
        router,
        "/list",
        serde_json::json!({"url": "https://www.youtube.com/watch?v=abc12345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["available_formats"], serde_json::json!(["medium"]));
    assert_eq!(json["metadata"]["title"], "A test video");
}
