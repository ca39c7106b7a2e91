//! Configuration module
//!
//! Environment-driven configuration for the service: server, storage
//! backend, public URL base, working directory, and the extractor binary.

use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_PORT: u16 = 7004;
const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

/// Which object-storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, anyhow::Error> {
        match value.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => Err(anyhow::anyhow!(
                "Invalid STORAGE_BACKEND: {other} (expected 's3' or 'local')"
            )),
        }
    }
}

/// Application configuration, loaded once at startup and passed explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    /// Custom endpoint for S3-compatible providers (R2, MinIO, Spaces).
    pub s3_endpoint: Option<String>,
    /// Base URL public artifact URLs are derived from.
    pub public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub download_dir: PathBuf,
    pub ytdlp_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = match env::var("SERVER_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("Invalid SERVER_PORT: {port}"))?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::parse(&value)?,
            Err(_) => StorageBackend::S3,
        };

        Ok(Config {
            server_port,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            download_dir: env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            ytdlp_path: env::var("YTDLP_PATH").unwrap_or_else(|_| DEFAULT_YTDLP_PATH.to_string()),
        })
    }

    /// Reject configurations missing variables the selected backend requires.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let missing: Vec<&str> = match self.storage_backend {
            StorageBackend::S3 => [
                ("S3_BUCKET", self.s3_bucket.is_none()),
                ("S3_REGION", self.s3_region.is_none()),
                ("PUBLIC_BASE_URL", self.public_base_url.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect(),
            StorageBackend::Local => [
                ("LOCAL_STORAGE_PATH", self.local_storage_path.is_none()),
                (
                    "LOCAL_STORAGE_BASE_URL",
                    self.local_storage_base_url.is_none(),
                ),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect(),
        };

        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
