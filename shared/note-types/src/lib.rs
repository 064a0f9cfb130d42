//! Types shared between the Jotnook backend and the note view
//!
//! This crate holds the wire shapes of the `/upload` and `/fetch` endpoints,
//! the storage layout constants both sides agree on, and the clock used to
//! derive note folder names.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Root prefix under which every note lives
pub const NOTES_ROOT_PREFIX: &str = "uploads/";

/// Folder name for a note created at `epoch_millis`
#[must_use]
pub fn timestamp_folder_name(epoch_millis: i64) -> String {
    format!("{NOTES_ROOT_PREFIX}note-{epoch_millis}")
}

/// Body of a note submission
///
/// Every field is optional on the wire so that missing values can be reported
/// as a client error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    /// Note text, encrypted before it is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 encoded image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Storage prefix for the note, e.g. `uploads/note-1700000000000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
}

/// A note as returned by the `/fetch` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Second path segment of the note's object keys
    pub note_id: String,
    /// Keys ending in `.jpg`, in listing order
    pub image_keys: Vec<String>,
    /// Keys ending in `.txt`, in listing order
    pub text_keys: Vec<String>,
    /// Decrypted text, or a placeholder when decryption failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Plain `{message}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response body, `error` carries the underlying failure when one is exposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a settable instant, for deterministic folder names
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}
