//! Result shapes returned to the caller.

use reelvault_core::{MediaInfo, Quality};
use serde::Serialize;

/// Public URLs of the artifacts one ingestion produced or found cached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactUrls {
    /// Absent on the metadata-only path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    pub info: Option<String>,
    pub subtitle: Option<String>,
}

/// Outcome of one ingestion call.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub video_id: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    pub urls: ArtifactUrls,
    pub metadata: MediaInfo,
}

/// Coarse metadata reported alongside format enumeration.
#[derive(Debug, Clone, Serialize)]
pub struct FormatMetadata {
    pub id: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
}

/// Which quality tiers the source offers at least one format for.
#[derive(Debug, Clone, Serialize)]
pub struct FormatReport {
    pub video_id: String,
    pub provider: String,
    pub available_formats: Vec<Quality>,
    pub metadata: FormatMetadata,
}
