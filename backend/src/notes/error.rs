//! Error types for the note handlers

use thiserror::Error;

use crate::{note_cipher::CipherError, note_storage::StorageError, secrets::SecretError};

/// Result type for note operations
pub type NoteResult<T> = Result<T, NoteError>;

/// Errors that abort a note request
#[derive(Error, Debug)]
pub enum NoteError {
    /// The submission is missing data or carries data that cannot be used
    #[error("{0}")]
    InvalidInput(String),

    /// Configuration secrets could not be resolved
    #[error(transparent)]
    Secrets(#[from] SecretError),

    /// Encrypting the note text failed
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Listing, reading or writing note objects failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}
