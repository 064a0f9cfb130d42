//! State of the notes screen: the grid, the compose form and the detail card

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jotnook_types::{timestamp_folder_name, Clock, NoteRecord, SaveNoteRequest};

use crate::{api::NotesApi, error::ApiResult};

/// A note as rendered in the grid and the detail card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub note_id: String,
    pub title: String,
    pub text: Option<String>,
    /// Public URL of the note's first image
    pub image_url: Option<String>,
}

/// Result of a save action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Text or image missing, nothing was sent
    Incomplete,
    /// The note was stored under `folder_name` and the list refreshed
    Saved { folder_name: String },
    /// The upload failed, the draft is kept
    Failed(String),
}

/// View-model of the notes screen
///
/// Holds UI state only. The note list always comes from the endpoint.
pub struct NoteView<A> {
    api: A,
    clock: Arc<dyn Clock>,
    image_base_url: String,
    notes: Vec<NoteRecord>,
    composing: bool,
    uploading: bool,
    draft_text: String,
    draft_image: Option<Vec<u8>>,
    selected: Option<String>,
}

impl<A: NotesApi> NoteView<A> {
    /// Creates an empty view
    ///
    /// `image_base_url` is the public address images are served from, e.g.
    /// `https://jotnook-bucket.s3.amazonaws.com`.
    pub fn new(api: A, clock: Arc<dyn Clock>, image_base_url: impl Into<String>) -> Self {
        Self {
            api,
            clock,
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            notes: Vec::new(),
            composing: false,
            uploading: false,
            draft_text: String::new(),
            draft_image: None,
            selected: None,
        }
    }

    /// Loads the note list when the screen opens
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Replaces the note list with the endpoint's current answer
    ///
    /// Failures are logged and leave the current list untouched.
    pub async fn refresh(&mut self) {
        match self.api.fetch_notes().await {
            Ok(notes) => {
                tracing::debug!("Fetched {} notes", notes.len());
                self.notes = notes;
            }
            Err(e) => tracing::error!("Error fetching notes: {e}"),
        }
    }

    pub fn open_composer(&mut self) {
        self.composing = true;
    }

    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
    }

    pub fn attach_image(&mut self, image: Vec<u8>) {
        self.draft_image = Some(image);
    }

    /// Sends the draft as a new note
    ///
    /// Runs [`NoteView::begin_save`], the upload and [`NoteView::finish_save`]
    /// in one go.
    pub async fn save(&mut self) -> SaveOutcome {
        let Some(request) = self.begin_save() else {
            return SaveOutcome::Incomplete;
        };

        let result = self.api.save_note(&request).await;
        self.finish_save(&request, result).await
    }

    /// Marks the view as uploading and builds the request for the draft
    ///
    /// The folder name is derived from the clock on the client. Returns `None`
    /// without touching any state when text or image is missing. The caller
    /// sends the request and hands the result to [`NoteView::finish_save`].
    pub fn begin_save(&mut self) -> Option<SaveNoteRequest> {
        let Some(image) = self.draft_image.as_ref().filter(|_| !self.draft_text.is_empty()) else {
            tracing::info!("Please add both text and an image to the note.");
            return None;
        };

        let request = SaveNoteRequest {
            text: Some(self.draft_text.clone()),
            image: Some(STANDARD.encode(image)),
            folder_name: Some(timestamp_folder_name(self.clock.now_millis())),
        };
        self.uploading = true;
        Some(request)
    }

    /// Applies the result of an upload started with [`NoteView::begin_save`]
    ///
    /// On success the compose form is closed and cleared and the list is
    /// fetched again; on failure the draft stays as it was.
    pub async fn finish_save(
        &mut self,
        request: &SaveNoteRequest,
        result: ApiResult<()>,
    ) -> SaveOutcome {
        self.uploading = false;
        let folder_name = request.folder_name.clone().unwrap_or_default();

        match result {
            Ok(()) => {
                tracing::info!("Note saved under {folder_name}");
                self.composing = false;
                self.draft_text.clear();
                self.draft_image = None;
                self.refresh().await;
                SaveOutcome::Saved { folder_name }
            }
            Err(e) => {
                tracing::error!("Error during the save process: {e}");
                SaveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Opens the detail card of a listed note, returns whether it exists
    pub fn select(&mut self, note_id: &str) -> bool {
        let exists = self.notes.iter().any(|note| note.note_id == note_id);
        if exists {
            self.selected = Some(note_id.to_string());
        }
        exists
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Cards for the grid, in list order
    #[must_use]
    pub fn cards(&self) -> Vec<NoteCard> {
        self.notes.iter().map(|note| self.card(note)).collect()
    }

    /// Card of the selected note
    #[must_use]
    pub fn selected_card(&self) -> Option<NoteCard> {
        let selected = self.selected.as_deref()?;
        self.notes
            .iter()
            .find(|note| note.note_id == selected)
            .map(|note| self.card(note))
    }

    fn card(&self, note: &NoteRecord) -> NoteCard {
        NoteCard {
            note_id: note.note_id.clone(),
            title: format!("Note {}", note.note_id),
            text: note.text.clone(),
            image_url: note
                .image_keys
                .first()
                .map(|key| format!("{}/{key}", self.image_base_url)),
        }
    }

    #[must_use]
    pub fn notes(&self) -> &[NoteRecord] {
        &self.notes
    }

    #[must_use]
    pub const fn is_composing(&self) -> bool {
        self.composing
    }

    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        self.uploading
    }

    #[must_use]
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    #[must_use]
    pub fn has_draft_image(&self) -> bool {
        self.draft_image.is_some()
    }
}
