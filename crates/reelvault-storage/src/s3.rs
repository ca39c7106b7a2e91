use crate::keys::join_public_url;
use crate::traits::{ObjectStore, Presence, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Files at or above this size go through the multipart protocol.
pub const MULTIPART_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Ceiling on the number of parts in one multipart upload.
const MAX_PARTS: u64 = 10_000;

/// Part size bounds. The lower bound caps request count for mid-size files;
/// the upper bound caps per-request memory for very large ones.
const MIN_PART_SIZE: u64 = 10 * 1024 * 1024;
const MAX_PART_SIZE: u64 = 100 * 1024 * 1024;

/// Width of the per-upload worker pool for part transfers.
const PART_CONCURRENCY: usize = 10;

/// Whether a file of the given size uses the multipart protocol.
pub fn uses_multipart(file_size: u64) -> bool {
    file_size >= MULTIPART_THRESHOLD
}

/// Part size for a multipart upload: target at most `MAX_PARTS` parts,
/// clamped to the `[MIN_PART_SIZE, MAX_PART_SIZE]` window.
pub fn part_size_for(file_size: u64) -> u64 {
    file_size.div_ceil(MAX_PARTS).clamp(MIN_PART_SIZE, MAX_PART_SIZE)
}

/// Sort collected parts ascending by part number for the completion call.
/// Task completion order is unspecified and must not be trusted.
fn order_parts(mut parts: Vec<(i32, String)>) -> Vec<CompletedPart> {
    parts.sort_by_key(|(part_number, _)| *part_number);
    parts
        .into_iter()
        .map(|(part_number, etag)| {
            CompletedPart::builder()
                .part_number(part_number)
                .e_tag(etag)
                .build()
        })
        .collect()
}

fn content_type_for_key(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("json") => "application/json",
        Some("vtt") => "text/vtt",
        _ => "application/octet-stream",
    }
}

/// S3 object store (AWS S3 or S3-compatible providers such as R2 and MinIO).
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    /// Create a new S3Store.
    ///
    /// # Arguments
    /// * `bucket` - bucket name
    /// * `region` - region identifier (`auto` for R2)
    /// * `endpoint_url` - custom endpoint for S3-compatible providers
    /// * `public_base_url` - base URL public artifact URLs are derived from
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: String,
    ) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        let retry_config = RetryConfig::standard()
            .with_max_attempts(5)
            .with_retry_mode(RetryMode::Adaptive);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers need path-style addressing
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned())
                .retry_config(retry_config)
                .force_path_style(true);
            if let Some(provider) = config.credentials_provider().into_iter().next() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3Store {
            client,
            bucket,
            public_base_url,
        })
    }

    async fn upload_single(&self, local_file: &Path, key: &str, size: u64) -> StorageResult<String> {
        let start = std::time::Instant::now();

        let body = ByteStream::from_path(local_file)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to open {}: {}", local_file.display(), e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type_for_key(key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.public_url(key))
    }

    async fn upload_multipart(
        &self,
        local_file: &Path,
        key: &str,
        file_size: u64,
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();
        let part_size = part_size_for(file_size) as usize;

        // Open the file before creating the session so an open failure
        // cannot orphan a session.
        let mut file = tokio::fs::File::open(local_file).await?;

        let create_result = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type_for_key(key))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to create multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let upload_id = create_result
            .upload_id()
            .ok_or_else(|| StorageError::UploadFailed("No upload ID returned from S3".to_string()))?
            .to_string();

        let uploader = Arc::new(S3PartUploader {
            client: self.client.clone(),
            bucket: self.bucket.clone(),
            key: key.to_string(),
            upload_id: upload_id.clone(),
        });

        // Any failure from here on leaves a live session on the backend;
        // the session must be aborted before the error propagates.
        let parts = match drive_parts(uploader, &mut file, part_size).await {
            Ok(parts) => parts,
            Err(error) => {
                self.abort_upload(key, &upload_id).await;
                return Err(error);
            }
        };
        let part_count = parts.len();

        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(order_parts(parts)))
            .build();

        if let Err(e) = self
            .client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(completed)
            .send()
            .await
        {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "Failed to complete multipart upload"
            );
            self.abort_upload(key, &upload_id).await;
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = file_size,
            parts = part_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(self.public_url(key))
    }

    /// Best-effort multipart abort; a failure here is logged, not escalated.
    async fn abort_upload(&self, key: &str, upload_id: &str) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
        {
            tracing::warn!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                upload_id = %upload_id,
                "Failed to abort multipart upload"
            );
        }
    }
}

/// Transfer of one numbered part. Separated from the read/dispatch loop so
/// the loop's concurrency and failure handling run under test without a
/// backend.
#[async_trait]
trait PartUploader: Send + Sync + 'static {
    /// Upload one part and return its ETag.
    async fn upload_part(&self, part_number: i32, body: Bytes) -> StorageResult<String>;
}

struct S3PartUploader {
    client: Client,
    bucket: String,
    key: String,
    upload_id: String,
}

#[async_trait]
impl PartUploader for S3PartUploader {
    async fn upload_part(&self, part_number: i32, body: Bytes) -> StorageResult<String> {
        let result = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(&self.key)
            .upload_id(&self.upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %self.key,
                    part_number,
                    "Failed to upload part"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        result
            .e_tag()
            .map(str::to_string)
            .ok_or_else(|| {
                StorageError::UploadFailed(format!("No ETag returned for part {}", part_number))
            })
    }
}

/// Read parts sequentially from `reader` and transfer each on its own task.
///
/// The permit is acquired before each read, keeping at most one part buffer
/// resident per in-flight task. Every spawned task is awaited on every exit
/// path, including a failed read, so no part transfer outlives this call;
/// the first failure wins and is returned after the drain.
async fn drive_parts<U, R>(
    uploader: Arc<U>,
    reader: &mut R,
    part_size: usize,
) -> StorageResult<Vec<(i32, String)>>
where
    U: PartUploader,
    R: AsyncRead + Unpin + Send,
{
    let semaphore = Arc::new(Semaphore::new(PART_CONCURRENCY));
    let mut tasks: Vec<JoinHandle<StorageResult<(i32, String)>>> = Vec::new();
    let mut part_number: i32 = 1;
    let mut failure: Option<StorageError> = None;

    loop {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                failure = Some(StorageError::UploadFailed(
                    "Part upload pool closed".to_string(),
                ));
                break;
            }
        };

        let chunk = match read_part(reader, part_size).await {
            Ok(chunk) => chunk,
            Err(e) => {
                failure = Some(e);
                break;
            }
        };
        if chunk.is_empty() {
            break;
        }

        let uploader = uploader.clone();
        let number = part_number;
        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            let etag = uploader.upload_part(number, chunk).await?;
            Ok((number, etag))
        }));

        part_number += 1;
    }

    let mut parts: Vec<(i32, String)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(Ok(part)) => parts.push(part),
            Ok(Err(e)) => failure = failure.or(Some(e)),
            Err(e) => {
                failure = failure
                    .or_else(|| Some(StorageError::UploadFailed(format!("Part task failed: {}", e))))
            }
        }
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(parts),
    }
}

/// Read up to `part_size` bytes from the reader's forward-only cursor.
async fn read_part<R: AsyncRead + Unpin>(reader: &mut R, part_size: usize) -> StorageResult<Bytes> {
    let mut buffer = vec![0u8; part_size];
    let mut filled = 0usize;
    while filled < part_size {
        let read = reader.read(&mut buffer[filled..]).await?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    buffer.truncate(filled);
    Ok(Bytes::from(buffer))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn probe(&self, key: &str) -> Presence {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Presence::Found,
            Err(e) => match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => Presence::NotFound,
                    _ => Presence::CheckFailed(e.to_string()),
                },
                _ => Presence::CheckFailed(e.to_string()),
            },
        }
    }

    async fn upload_file(&self, local_file: &Path, key: &str) -> StorageResult<String> {
        let file_size = tokio::fs::metadata(local_file).await?.len();
        if uses_multipart(file_size) {
            self.upload_multipart(local_file, key, file_size).await
        } else {
            self.upload_single(local_file, key, file_size).await
        }
    }

    fn public_url(&self, key: &str) -> String {
        join_public_url(&self.public_base_url, key)
    }
}
