//! S3-backed document store

use super::request_failed;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use relay_application::{DocumentStore, StoreError};
use tracing::debug;

pub struct S3DocumentStore {
    client: S3Client,
    bucket: Option<String>,
}

impl S3DocumentStore {
    /// A store without a bucket rejects every fetch with `NotConfigured`.
    pub fn new(sdk_config: &aws_config::SdkConfig, bucket: Option<String>) -> Self {
        Self {
            client: S3Client::new(sdk_config),
            bucket,
        }
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let bucket = self.bucket.as_deref().ok_or_else(|| {
            StoreError::NotConfigured("storage.document_bucket is not set".to_string())
        })?;

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| convert_get_object_error(key, e))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::RequestFailed(format!("Reading {}: {}", key, e)))?
            .into_bytes()
            .to_vec();

        debug!(bucket, key, size = bytes.len(), "Document fetched");
        Ok(bytes)
    }
}

fn convert_get_object_error(key: &str, err: SdkError<GetObjectError>) -> StoreError {
    if let SdkError::ServiceError(ref service_err) = err
        && matches!(service_err.err(), GetObjectError::NoSuchKey(_))
    {
        return StoreError::NotFound(key.to_string());
    }
    request_failed("GetObject", &err)
}
