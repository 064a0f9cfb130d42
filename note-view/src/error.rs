//! Error types for calls to the note endpoints

use thiserror::Error;

/// Result type for note endpoint calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the note endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// The endpoint base URL cannot be parsed
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request could not be sent or the response could not be decoded
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Endpoint returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, or the raw body
        message: String,
    },
}
