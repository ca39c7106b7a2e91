//! The extraction capability the orchestrator depends on.
//!
//! Options are an explicit struct rather than a free-form bag so every
//! recognized knob and its default is visible, and so tests can run against
//! a fake extractor.

use async_trait::async_trait;
use reelvault_core::{MediaInfo, ProbeInfo};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to run extractor: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Extraction failed: {0}")]
    Failed(String),

    #[error("Extractor produced invalid metadata: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// One extraction run's options. Output files are written next to
/// `output_base` with the extractor choosing the extension.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub skip_download: bool,
    pub write_subtitles: bool,
    pub write_automatic_subtitles: bool,
    pub subtitle_languages: Vec<String>,
    pub subtitle_format: String,
    pub format_selector: Option<String>,
    pub output_base: PathBuf,
}

impl ExtractRequest {
    /// Metadata and subtitles only; no media download.
    pub fn metadata_only(output_base: PathBuf) -> Self {
        ExtractRequest {
            skip_download: true,
            write_subtitles: true,
            write_automatic_subtitles: true,
            subtitle_languages: vec!["en".to_string()],
            subtitle_format: "vtt".to_string(),
            format_selector: None,
            output_base,
        }
    }

    /// Full download with the given format selector, plus subtitles.
    pub fn download(output_base: PathBuf, format_selector: &str) -> Self {
        ExtractRequest {
            skip_download: false,
            format_selector: Some(format_selector.to_string()),
            ..Self::metadata_only(output_base)
        }
    }
}

/// Output of one extraction run: reduced metadata plus whichever files the
/// extractor produced on local disk.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub info: MediaInfo,
    pub media_path: Option<PathBuf>,
    pub subtitle_path: Option<PathBuf>,
}

/// External component that understands site-specific download mechanics.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Probe-only mode: metadata and offered formats, no files written.
    async fn probe(&self, url: &str) -> Result<ProbeInfo, ExtractError>;

    /// Run an extraction, writing files under the request's output base.
    async fn extract(&self, url: &str, request: &ExtractRequest) -> Result<Extraction, ExtractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_only_defaults_match_the_contract() {
        let req = ExtractRequest::metadata_only(PathBuf::from("/tmp/work/x"));
        assert!(req.skip_download);
        assert!(req.write_subtitles);
        assert!(req.write_automatic_subtitles);
        assert_eq!(req.subtitle_languages, vec!["en".to_string()]);
        assert_eq!(req.subtitle_format, "vtt");
        assert!(req.format_selector.is_none());
    }

    #[test]
    fn download_request_keeps_subtitle_defaults() {
        let req = ExtractRequest::download(PathBuf::from("/tmp/work/x"), "bestvideo+bestaudio/best");
        assert!(!req.skip_download);
        assert_eq!(req.format_selector.as_deref(), Some("bestvideo+bestaudio/best"));
        assert_eq!(req.subtitle_format, "vtt");
    }
}
