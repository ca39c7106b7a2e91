//! Local filesystem backend, used for development and as the store double
//! in tests. Mirrors the S3 backend's key layout and public URL shape.

use crate::keys::join_public_url;
use crate::traits::{ObjectStore, Presence, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore rooted at `base_path`, serving public URLs
    /// under `base_url`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    /// Map a storage key to a filesystem path, rejecting traversal.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') || key.is_empty() {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn probe(&self, key: &str) -> Presence {
        let path = match self.key_to_path(key) {
            Ok(path) => path,
            Err(e) => return Presence::CheckFailed(e.to_string()),
        };
        match fs::try_exists(&path).await {
            Ok(true) => Presence::Found,
            Ok(false) => Presence::NotFound,
            Err(e) => Presence::CheckFailed(e.to_string()),
        }
    }

    async fn upload_file(&self, local_file: &Path, key: &str) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::copy(local_file, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                local_file.display(),
                path.display(),
                e
            ))
        })?;

        tracing::debug!(key = %key, path = %path.display(), "Local upload successful");
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        join_public_url(&self.base_url, key)
    }
}
