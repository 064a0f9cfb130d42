//! Error types for secret retrieval

use aws_sdk_secretsmanager::{error::SdkError, operation::get_secret_value::GetSecretValueError};
use thiserror::Error;

/// Result type for secret retrieval
pub type SecretResult<T> = Result<T, SecretError>;

/// Errors that can occur while resolving the configuration secret
#[derive(Error, Debug)]
pub enum SecretError {
    /// The secret store could not be reached or the identifier does not exist
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    /// The secret has no string payload or the payload is not a JSON object of strings
    #[error("Malformed secret: {0}")]
    Malformed(String),

    /// A required entry is absent from the secret
    #[error("Secret is missing required entry: {0}")]
    MissingField(&'static str),
}

impl From<SdkError<GetSecretValueError>> for SecretError {
    fn from(error: SdkError<GetSecretValueError>) -> Self {
        match error {
            SdkError::ServiceError(err) => Self::Unavailable(format!("{:?}", err.err())),
            _ => Self::Unavailable(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for SecretError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}
