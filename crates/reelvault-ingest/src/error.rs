//! Ingestion error taxonomy.

use reelvault_extract::ExtractError;
use reelvault_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Extractor produced no media file")]
    MissingMedia,

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to recover stored metadata: {0}")]
    MetadataFetch(#[from] reqwest::Error),

    #[error("Failed to encode metadata: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
