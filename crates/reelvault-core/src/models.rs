//! Metadata models shared between extraction, ingestion, and the API.

use serde::{Deserialize, Serialize};

/// Minimal metadata document persisted as the info artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// One format offered by the source, as reported by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_id: Option<String>,
    /// Vertical resolution; absent for audio-only formats.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Probe-only extraction output: coarse metadata plus the offered formats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_info_tolerates_missing_fields() {
        let info: MediaInfo = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(info.id.as_deref(), Some("abc"));
        assert_eq!(info.title, "");
        assert!(info.thumbnail.is_none());
    }

    #[test]
    fn probe_info_tolerates_heightless_formats() {
        let probe: ProbeInfo = serde_json::from_str(
            r#"{"title":"t","formats":[{"format_id":"140"},{"format_id":"22","height":720}]}"#,
        )
        .unwrap();
        assert_eq!(probe.formats.len(), 2);
        assert_eq!(probe.formats[0].height, None);
        assert_eq!(probe.formats[1].height, Some(720));
    }
}
