//! Error types for note encryption

use aws_sdk_kms::{
    error::SdkError,
    operation::{decrypt::DecryptError, encrypt::EncryptError},
};
use thiserror::Error;

/// Result type for cipher operations
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors that can occur while encrypting or decrypting note text
#[derive(Error, Debug)]
pub enum CipherError {
    /// KMS rejected the request or could not be reached
    #[error("KMS error: {0}")]
    Service(String),

    /// KMS answered without the expected payload
    #[error("No {0} returned from KMS")]
    EmptyResponse(&'static str),
}

impl From<SdkError<EncryptError>> for CipherError {
    fn from(error: SdkError<EncryptError>) -> Self {
        match error {
            SdkError::ServiceError(err) => Self::Service(format!("{:?}", err.err())),
            _ => Self::Service(error.to_string()),
        }
    }
}

impl From<SdkError<DecryptError>> for CipherError {
    fn from(error: SdkError<DecryptError>) -> Self {
        match error {
            SdkError::ServiceError(err) => Self::Service(format!("{:?}", err.err())),
            _ => Self::Service(error.to_string()),
        }
    }
}
