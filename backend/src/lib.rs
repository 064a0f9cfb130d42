//! Jotnook backend: stores notes as KMS-encrypted text plus an image in S3

/// Key-management encryption of note text
pub mod note_cipher;

/// Object storage for note payloads
pub mod note_storage;

/// Note writer, reader and storage layout
pub mod notes;

/// HTTP routes
pub mod routes;

/// Configuration secret resolution
pub mod secrets;

/// Server bootstrap
pub mod server;

/// Environment and error types
pub mod types;

/// In-memory stand-ins for the AWS-backed handles
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
