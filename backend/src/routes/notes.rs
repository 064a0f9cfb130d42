use std::sync::Arc;

use axum::{
    body::Bytes, extract::rejection::BytesRejection, http::StatusCode, Extension, Json,
};
use jotnook_types::{MessageResponse, NoteRecord, SaveNoteRequest};
use tracing::instrument;

use crate::{
    notes::{NoteReader, NoteWriter, ValidatedNote},
    types::AppError,
};

/// Largest `/upload` body accepted, matching the 6 MB Lambda request payload ceiling
pub const MAX_UPLOAD_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Stores a new note
///
/// Accepts `{text, image, folderName?}` where `image` is base64 encoded. The text
/// is encrypted and written to `<folder>/note.txt`, the decoded image to
/// `<folder>/image.jpg`. Without a folder name the note goes to
/// `uploads/note-<epoch millis>`.
///
/// # Errors
///
/// - 400 when the body is empty, not JSON, or lacks `text` or `image`
/// - 413 when the body exceeds [`MAX_UPLOAD_BODY_BYTES`]
/// - 500 when secrets, encryption or either object write fail
#[instrument(skip_all)]
pub async fn upload_note(
    Extension(writer): Extension<Arc<NoteWriter>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body exceeds {MAX_UPLOAD_BODY_BYTES} bytes"),
                None,
            )
        } else {
            AppError::bad_request(rejection.body_text())
        }
    })?;

    if body.is_empty() {
        return Err(AppError::bad_request(
            "No body provided or body not in JSON format",
        ));
    }

    let request: SaveNoteRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejected note body: {e}");
        AppError::bad_request("No body provided or body not in JSON format")
    })?;

    let note = ValidatedNote::try_from(request).map_err(AppError::from_write_error)?;

    writer
        .write(note)
        .await
        .map_err(AppError::from_write_error)?;

    Ok(Json(MessageResponse {
        message: "Note saved successfully!".to_string(),
    }))
}

/// Lists every stored note with its decrypted text
///
/// # Errors
///
/// - 500 when secrets cannot be resolved or the listing fails
#[instrument(skip_all)]
pub async fn fetch_notes(
    Extension(reader): Extension<Arc<NoteReader>>,
) -> Result<Json<Vec<NoteRecord>>, AppError> {
    let notes = reader.read().await.map_err(AppError::from_read_error)?;

    tracing::info!("Returning {} notes", notes.len());

    Ok(Json(notes.into_iter().map(NoteRecord::from).collect()))
}
