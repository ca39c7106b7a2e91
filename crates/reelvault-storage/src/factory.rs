//! Backend selection from configuration.

use crate::{LocalStore, ObjectStore, S3Store, StorageError, StorageResult};
use reelvault_core::{Config, StorageBackend};
use std::sync::Arc;

/// Create the object store the configuration selects.
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_REGION not configured".to_string()))?;
            let public_base_url = config.public_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("PUBLIC_BASE_URL not configured".to_string())
            })?;

            let store =
                S3Store::new(bucket, region, config.s3_endpoint.clone(), public_base_url).await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let store = LocalStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }
    }
}
