//! Storage abstraction trait
//!
//! Defines the `ObjectStore` trait all storage backends implement, the
//! storage error taxonomy, and the three-way existence probe result.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of an existence probe.
///
/// `CheckFailed` keeps transport errors distinct from a definite miss:
/// collapsing the two turns an outage into silent re-uploads. Callers that
/// treat `CheckFailed` as a miss should log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Found,
    NotFound,
    CheckFailed(String),
}

impl Presence {
    pub fn is_found(&self) -> bool {
        matches!(self, Presence::Found)
    }
}

/// Object storage capability used by the ingestion orchestrator.
///
/// Implementations are stateless and safe to share across concurrent
/// requests behind an `Arc`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only existence probe for a key.
    async fn probe(&self, key: &str) -> Presence;

    /// Upload a local file to the given key and return its public URL.
    ///
    /// Backends pick the transfer strategy from the file size; large files
    /// go through the multipart protocol.
    async fn upload_file(&self, local_file: &Path, key: &str) -> StorageResult<String>;

    /// Public URL for a key, whether or not the object exists yet.
    fn public_url(&self, key: &str) -> String;
}
