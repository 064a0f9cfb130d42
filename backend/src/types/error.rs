//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jotnook_types::ErrorResponse;

use crate::notes::NoteError;

/// Application error: a status code and a `{message, error?}` body
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            inner: ErrorResponse {
                message: message.into(),
                error,
            },
        }
    }

    /// Malformed or incomplete request
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, None)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a failed note submission
    ///
    /// Secret failures stay generic, other server errors expose their cause.
    #[must_use]
    pub fn from_write_error(err: NoteError) -> Self {
        match err {
            NoteError::InvalidInput(msg) => Self::bad_request(msg),
            NoteError::Secrets(e) => {
                tracing::error!("Error retrieving secrets: {e}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error retrieving secrets",
                    None,
                )
            }
            NoteError::Cipher(_) | NoteError::Storage(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save note",
                Some(err.to_string()),
            ),
        }
    }

    /// Maps a failed note listing
    #[must_use]
    pub fn from_read_error(err: NoteError) -> Self {
        match err {
            NoteError::InvalidInput(msg) => Self::bad_request(msg),
            NoteError::Secrets(e) => {
                tracing::error!("Error retrieving secrets: {e}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error retrieving secrets",
                    None,
                )
            }
            NoteError::Cipher(e) => {
                tracing::error!("Cipher error: {e}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error listing notes", None)
            }
            NoteError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error listing notes", None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {}", self.inner.message),
            500..=599 => tracing::error!(
                "Server error: {} {}",
                self.inner.message,
                self.inner.error.as_deref().unwrap_or_default()
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{note_storage::StorageError, secrets::SecretError};

    #[test]
    fn test_write_errors() {
        let err = AppError::from_write_error(NoteError::InvalidInput("missing".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.inner.error, None);

        let err = AppError::from_write_error(NoteError::Secrets(SecretError::Unavailable(
            "denied".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.inner.message, "Error retrieving secrets");
        assert_eq!(err.inner.error, None);

        let err = AppError::from_write_error(NoteError::Storage(StorageError::Service(
            "AccessDenied".to_string(),
        )));
        assert_eq!(err.inner.message, "Failed to save note");
        assert_eq!(
            err.inner.error.as_deref(),
            Some("S3 service error: AccessDenied")
        );
    }

    #[test]
    fn test_read_errors_hide_cause() {
        let err = AppError::from_read_error(NoteError::Storage(StorageError::Upstream(
            "503".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.inner.message, "Error listing notes");
        assert_eq!(err.inner.error, None);
    }
}
