//! Ingestion orchestration: identity → cache check → extract → upload.

use crate::error::IngestError;
use crate::receipt::{ArtifactUrls, FormatMetadata, FormatReport, IngestReceipt};
use reelvault_core::{identity, MediaInfo, Quality};
use reelvault_extract::{ExtractRequest, Extractor};
use reelvault_storage::{object_key, ArtifactKind, ObjectStore, Presence};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Orchestrates one ingestion request end to end.
///
/// Holds no cross-request mutable state; safe to share behind an `Arc`.
/// Concurrent requests for the same not-yet-cached identity are not
/// coalesced: both miss the existence check and both extract, which is
/// wasteful but converges on the same deterministic keys.
pub struct IngestService {
    store: Arc<dyn ObjectStore>,
    extractor: Arc<dyn Extractor>,
    http: reqwest::Client,
    workdir: PathBuf,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        extractor: Arc<dyn Extractor>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        IngestService {
            store,
            extractor,
            http: reqwest::Client::new(),
            workdir: workdir.into(),
        }
    }

    /// Fetch metadata and subtitles for a URL, without the media itself.
    ///
    /// Cache hit only when both the info and subtitle artifacts exist.
    pub async fn fetch_media_and_subtitles(&self, url: &str) -> Result<IngestReceipt, IngestError> {
        let identity = identity::resolve(url);
        let info_key = object_key(&identity.provider, &identity.id, ArtifactKind::Info, None);
        let subtitle_key = object_key(&identity.provider, &identity.id, ArtifactKind::Subtitle, None);

        if self.key_cached(&info_key).await && self.key_cached(&subtitle_key).await {
            tracing::info!(key = %info_key, "Metadata already in store");
            let metadata = self.fetch_stored_info(&info_key).await?;
            return Ok(IngestReceipt {
                video_id: identity.id,
                provider: identity.provider,
                quality: None,
                urls: ArtifactUrls {
                    video: None,
                    info: Some(self.store.public_url(&info_key)),
                    subtitle: Some(self.store.public_url(&subtitle_key)),
                },
                metadata,
            });
        }

        // Scratch dir is dropped on every exit path, deleting whatever the
        // extractor wrote.
        let scratch = self.scratch_dir().await?;
        let request = ExtractRequest::metadata_only(scratch.path().join("media"));
        let extraction = self.extractor.extract(url, &request).await?;

        let info_path = write_info_file(scratch.path(), &extraction.info).await?;
        let info_url = Some(self.store.upload_file(&info_path, &info_key).await?);

        let subtitle_url = match &extraction.subtitle_path {
            Some(path) => Some(self.store.upload_file(path, &subtitle_key).await?),
            None => None,
        };

        tracing::info!(
            video_id = %identity.id,
            provider = %identity.provider,
            subtitle = subtitle_url.is_some(),
            "Metadata ingestion finished"
        );

        Ok(IngestReceipt {
            video_id: identity.id,
            provider: identity.provider,
            quality: None,
            urls: ArtifactUrls {
                video: None,
                info: info_url,
                subtitle: subtitle_url,
            },
            metadata: extraction.info,
        })
    }

    /// Fetch the media at a quality tier and store it with its metadata and
    /// subtitle artifacts. Idempotent for deterministic identities: a
    /// cached media key short-circuits without invoking extraction.
    pub async fn fetch_and_store_video(
        &self,
        url: &str,
        quality: Quality,
    ) -> Result<IngestReceipt, IngestError> {
        let identity = identity::resolve(url);
        let video_key = object_key(&identity.provider, &identity.id, ArtifactKind::Media, Some(quality));
        let info_key = object_key(&identity.provider, &identity.id, ArtifactKind::Info, None);
        let subtitle_key = object_key(&identity.provider, &identity.id, ArtifactKind::Subtitle, None);

        if self.key_cached(&video_key).await {
            tracing::info!(key = %video_key, "Media already in store");
            let metadata = self.fetch_stored_info(&info_key).await?;
            let subtitle_url = if self.key_cached(&subtitle_key).await {
                Some(self.store.public_url(&subtitle_key))
            } else {
                None
            };
            return Ok(IngestReceipt {
                video_id: identity.id,
                provider: identity.provider,
                quality: Some(quality),
                urls: ArtifactUrls {
                    video: Some(self.store.public_url(&video_key)),
                    info: Some(self.store.public_url(&info_key)),
                    subtitle: subtitle_url,
                },
                metadata,
            });
        }

        let scratch = self.scratch_dir().await?;
        let request = ExtractRequest::download(scratch.path().join("media"), quality.format_selector());
        let extraction = self.extractor.extract(url, &request).await?;

        let media_path = extraction.media_path.as_deref().ok_or(IngestError::MissingMedia)?;
        let video_url = self.store.upload_file(media_path, &video_key).await?;

        // A failure from here on is not rolled back: the media artifact
        // stays uploaded and a retry overwrites the same keys.
        let info_path = write_info_file(scratch.path(), &extraction.info).await?;
        let info_url = Some(self.store.upload_file(&info_path, &info_key).await?);

        let subtitle_url = match &extraction.subtitle_path {
            Some(path) => Some(self.store.upload_file(path, &subtitle_key).await?),
            None => None,
        };

        tracing::info!(
            video_id = %identity.id,
            provider = %identity.provider,
            quality = %quality,
            subtitle = subtitle_url.is_some(),
            "Media ingestion finished"
        );

        Ok(IngestReceipt {
            video_id: identity.id,
            provider: identity.provider,
            quality: Some(quality),
            urls: ArtifactUrls {
                video: Some(video_url),
                info: info_url,
                subtitle: subtitle_url,
            },
            metadata: extraction.info,
        })
    }

    /// Probe which quality tiers the source offers. No storage interaction.
    pub async fn list_formats(&self, url: &str) -> Result<FormatReport, IngestError> {
        let identity = identity::resolve(url);
        let probe = self.extractor.probe(url).await?;

        let available_formats: Vec<Quality> = Quality::ALL
            .into_iter()
            .filter(|tier| {
                probe
                    .formats
                    .iter()
                    .filter_map(|format| format.height)
                    .any(|height| Quality::bucket_for_height(height) == *tier)
            })
            .collect();

        Ok(FormatReport {
            video_id: identity.id,
            provider: identity.provider,
            available_formats,
            metadata: FormatMetadata {
                id: probe.id,
                title: probe.title,
                thumbnail: probe.thumbnail,
            },
        })
    }

    /// Existence gate for one artifact key. A failed check is treated as a
    /// miss (re-fetching is idempotent) but logged so outages stay visible.
    async fn key_cached(&self, key: &str) -> bool {
        match self.store.probe(key).await {
            Presence::Found => true,
            Presence::NotFound => false,
            Presence::CheckFailed(reason) => {
                tracing::warn!(key = %key, reason = %reason, "Existence check failed; treating as miss");
                false
            }
        }
    }

    /// Recover a previously stored info document over HTTP from its public URL.
    async fn fetch_stored_info(&self, info_key: &str) -> Result<MediaInfo, IngestError> {
        let url = self.store.public_url(info_key);
        let info = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<MediaInfo>()
            .await?;
        Ok(info)
    }

    /// Per-request scratch directory under the working directory.
    async fn scratch_dir(&self) -> Result<TempDir, IngestError> {
        tokio::fs::create_dir_all(&self.workdir).await?;
        Ok(TempDir::new_in(&self.workdir)?)
    }
}

/// Persist the minimal info document next to the other scratch files.
async fn write_info_file(dir: &Path, info: &MediaInfo) -> Result<PathBuf, IngestError> {
    let path = dir.join("media.info.json");
    let body = serde_json::to_vec_pretty(info)?;
    tokio::fs::write(&path, body).await?;
    Ok(path)
}
