//! yt-dlp subprocess adapter.
//!
//! Runs the yt-dlp binary with `--dump-json --no-simulate` so one
//! invocation both performs the requested work and prints the info
//! document on stdout. Output files are discovered afterwards by probing
//! candidate extensions, since the extractor picks the container itself.

use crate::extractor::{ExtractError, ExtractRequest, Extraction, Extractor};
use async_trait::async_trait;
use reelvault_core::{MediaInfo, ProbeInfo};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Candidate media containers, in preference order.
const MEDIA_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mkv"];

/// Candidate subtitle suffixes; the language-qualified name comes first.
const SUBTITLE_EXTENSIONS: &[&str] = &[".en.vtt", ".vtt"];

/// Info document as yt-dlp emits it; reduced before leaving this module.
#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    ext: Option<String>,
}

impl RawInfo {
    fn minimal(&self) -> MediaInfo {
        MediaInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

pub struct YtDlpExtractor {
    binary: String,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        YtDlpExtractor {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<String, ExtractError> {
        tracing::debug!(binary = %self.binary, ?args, "Running extractor");

        let output = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Failed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Assemble the yt-dlp argument list for an extraction request.
fn build_args(url: &str, request: &ExtractRequest) -> Vec<String> {
    let mut args = vec![
        "--dump-json".to_string(),
        "--no-simulate".to_string(),
        "--no-warnings".to_string(),
    ];

    if request.skip_download {
        args.push("--skip-download".to_string());
    }
    if let Some(selector) = &request.format_selector {
        args.push("-f".to_string());
        args.push(selector.clone());
    }
    if request.write_subtitles {
        args.push("--write-subs".to_string());
    }
    if request.write_automatic_subtitles {
        args.push("--write-auto-subs".to_string());
    }
    if !request.subtitle_languages.is_empty() {
        args.push("--sub-langs".to_string());
        args.push(request.subtitle_languages.join(","));
    }
    args.push("--sub-format".to_string());
    args.push(request.subtitle_format.clone());

    args.push("-o".to_string());
    args.push(format!("{}.%(ext)s", request.output_base.display()));

    args.push(url.to_string());
    args
}

/// Find `{base}{ext}` for the first extension that exists on disk.
async fn find_with_extensions(base: &Path, extensions: &[&str]) -> Option<PathBuf> {
    for ext in extensions {
        let candidate = PathBuf::from(format!("{}{}", base.display(), ext));
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Some(candidate);
        }
    }
    None
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn probe(&self, url: &str) -> Result<ProbeInfo, ExtractError> {
        let args = vec![
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ];
        let stdout = self.run(&args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    async fn extract(&self, url: &str, request: &ExtractRequest) -> Result<Extraction, ExtractError> {
        let args = build_args(url, request);
        let stdout = self.run(&args).await?;

        // With playlists flattened off an invocation emits a single line.
        let first_line = stdout
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| ExtractError::Failed("Extractor produced no metadata".to_string()))?;
        let raw: RawInfo = serde_json::from_str(first_line)?;

        let media_path = if request.skip_download {
            None
        } else {
            // The expected container may differ from what was actually
            // written (e.g. merge to mkv), so probe the candidates.
            let expected = raw
                .ext
                .as_deref()
                .map(|ext| PathBuf::from(format!("{}.{}", request.output_base.display(), ext)));
            match expected {
                Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => Some(path),
                _ => find_with_extensions(&request.output_base, MEDIA_EXTENSIONS).await,
            }
        };

        let subtitle_path = find_with_extensions(&request.output_base, SUBTITLE_EXTENSIONS).await;

        tracing::debug!(
            url = %url,
            media = ?media_path,
            subtitle = ?subtitle_path,
            "Extraction finished"
        );

        Ok(Extraction {
            info: raw.minimal(),
            media_path,
            subtitle_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_only_args_skip_download() {
        let request = ExtractRequest::metadata_only(PathBuf::from("/work/tmp-id"));
        let args = build_args("https://youtu.be/abc12345678", &request);

        assert!(args.contains(&"--skip-download".to_string()));
        assert!(args.contains(&"--write-subs".to_string()));
        assert!(args.contains(&"--write-auto-subs".to_string()));
        assert!(!args.contains(&"-f".to_string()));

        let langs = args.iter().position(|a| a == "--sub-langs").unwrap();
        assert_eq!(args[langs + 1], "en");
        let output = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[output + 1], "/work/tmp-id.%(ext)s");
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc12345678");
    }

    #[test]
    fn download_args_carry_format_selector() {
        let request = ExtractRequest::download(
            PathBuf::from("/work/tmp-id"),
            "bestvideo[height<=720]+bestaudio/best[height<=720]",
        );
        let args = build_args("https://youtu.be/abc12345678", &request);

        assert!(!args.contains(&"--skip-download".to_string()));
        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "bestvideo[height<=720]+bestaudio/best[height<=720]");
    }

    #[tokio::test]
    async fn file_discovery_probes_candidate_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("tmp-id");

        assert_eq!(find_with_extensions(&base, MEDIA_EXTENSIONS).await, None);

        tokio::fs::write(dir.path().join("tmp-id.webm"), b"media")
            .await
            .unwrap();
        let found = find_with_extensions(&base, MEDIA_EXTENSIONS).await.unwrap();
        assert!(found.to_string_lossy().ends_with("tmp-id.webm"));

        tokio::fs::write(dir.path().join("tmp-id.en.vtt"), b"WEBVTT")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("tmp-id.vtt"), b"WEBVTT")
            .await
            .unwrap();
        // Language-qualified name wins over the bare one.
        let subtitle = find_with_extensions(&base, SUBTITLE_EXTENSIONS).await.unwrap();
        assert!(subtitle.to_string_lossy().ends_with("tmp-id.en.vtt"));
    }

    #[test]
    fn raw_info_reduces_to_minimal_document() {
        let raw: RawInfo = serde_json::from_str(
            r#"{"id":"abc12345678","title":"A title","description":"words",
                "thumbnail":"https://i.example/t.jpg","ext":"mp4",
                "formats":[{"format_id":"22","height":720}],"uploader":"x"}"#,
        )
        .unwrap();
        let info = raw.minimal();
        assert_eq!(info.id.as_deref(), Some("abc12345678"));
        assert_eq!(info.title, "A title");
        assert_eq!(info.thumbnail.as_deref(), Some("https://i.example/t.jpg"));
    }
}
