//! S3-based object storage for note payloads
mod error;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};

pub use error::{StorageError, StorageResult};

/// Flat key/value object storage, scoped per call to a bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists keys under `prefix` in the service's listing order
    ///
    /// Only the first page of results is returned.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the listing call fails
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>>;

    /// Reads a whole object into memory
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the object cannot be fetched or its body cannot be read
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Writes an object, replacing any object already stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the write fails
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;
}

/// Object storage backed by Amazon S3
pub struct S3ObjectStore {
    s3_client: Arc<S3Client>,
}

impl S3ObjectStore {
    /// Creates a new storage handle
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_keys(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<String>> {
        let output = self
            .s3_client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await?;

        if output.is_truncated().unwrap_or(false) {
            tracing::warn!("Listing under {prefix} is truncated, later pages are ignored");
        }

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(ToString::to_string))
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let output = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let body = output.body.collect().await?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(())
    }
}
