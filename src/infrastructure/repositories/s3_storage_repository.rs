use super::storage_repository::StorageRepository;
use crate::domain::tts::{PublishMetadata, AUDIO_CONTENT_TYPE, STORAGE_KIND};
use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, primitives::ByteStream, Client as S3Client};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// S3 implementation of the storage repository.
/// Objects are private; callers get a presigned GET URL.
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    bucket: Option<String>,
}

impl S3StorageRepository {
    pub fn new(s3_client: Arc<S3Client>, bucket: Option<String>) -> Self {
        Self { s3_client, bucket }
    }

    fn bucket(&self) -> Result<&str, String> {
        self.bucket
            .as_deref()
            .ok_or_else(|| "S3_BUCKET_NAME not configured".to_string())
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn publish(
        &self,
        audio: Vec<u8>,
        stored_name: &str,
        expires_in: Duration,
    ) -> Result<PublishMetadata, String> {
        let bucket = self.bucket()?;
        let size_bytes = audio.len() as u64;

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(stored_name)
            .body(ByteStream::from(audio))
            .content_type(AUDIO_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket, key = stored_name, "S3 put_object failed");
                format!("S3 upload error: {}", e)
            })?;

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| format!("Invalid presigned URL expiration: {}", e))?;

        let presigned = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(stored_name)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket, key = stored_name, "S3 presign failed");
                format!("S3 presign error: {}", e)
            })?;

        tracing::info!(
            bucket,
            key = stored_name,
            size_bytes,
            expires_in_secs = expires_in.as_secs(),
            "Audio published to S3"
        );

        Ok(PublishMetadata {
            url: presigned.uri().to_string(),
            storage: STORAGE_KIND.to_string(),
            content_type: AUDIO_CONTENT_TYPE.to_string(),
            created_at: Utc::now(),
            size_bytes,
            id: Uuid::new_v4().to_string(),
            stored_name: stored_name.to_string(),
            download_name: stored_name.to_string(),
        })
    }

    fn check_configured(&self) -> Result<(), String> {
        self.bucket().map(|_| ())
    }
}
