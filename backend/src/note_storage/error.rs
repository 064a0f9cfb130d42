//! Error types for note object storage

use std::fmt::Debug;

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        get_object::GetObjectError, list_objects_v2::ListObjectsV2Error,
        put_object::PutObjectError,
    },
    primitives::ByteStreamError,
};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service or transport error
    #[error("S3 service error: {0}")]
    Service(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// The object body could not be read
    #[error("Failed to read object body: {0}")]
    Body(String),
}

fn classify<E: Debug>(error: SdkError<E>) -> StorageError {
    match error {
        SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
            StorageError::Upstream(format!("{:?}", err.err()))
        }
        SdkError::ServiceError(err) => StorageError::Service(format!("{:?}", err.err())),
        _ => StorageError::Service(error.to_string()),
    }
}

impl From<SdkError<ListObjectsV2Error>> for StorageError {
    fn from(error: SdkError<ListObjectsV2Error>) -> Self {
        classify(error)
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        classify(error)
    }
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        classify(error)
    }
}

impl From<ByteStreamError> for StorageError {
    fn from(error: ByteStreamError) -> Self {
        Self::Body(error.to_string())
    }
}
