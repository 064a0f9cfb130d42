use std::sync::Arc;

use jotnook_types::NoteRecord;
use tracing::instrument;

use super::{
    layout::{group_keys_by_note_id, NoteGroup, DECRYPT_PLACEHOLDER, NOTES_ROOT_PREFIX},
    NoteResult,
};
use crate::{note_cipher::NoteCipher, note_storage::ObjectStore, secrets::SecretResolver};

/// Outcome of loading a note's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteText {
    /// The text object was decrypted
    Decrypted(String),
    /// Fetching or decrypting the text object failed
    Failed(String),
    /// The text object held no ciphertext and was not decrypted
    Skipped(String),
}

/// A note rebuilt from the object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub note_id: String,
    pub image_keys: Vec<String>,
    pub text_keys: Vec<String>,
    /// `None` when the note has no text object
    pub text: Option<NoteText>,
}

impl From<NoteGroup> for Note {
    fn from(group: NoteGroup) -> Self {
        Self {
            note_id: group.note_id,
            image_keys: group.image_keys,
            text_keys: group.text_keys,
            text: None,
        }
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        let text = match note.text {
            Some(NoteText::Decrypted(text)) => Some(text),
            Some(NoteText::Failed(_)) => Some(DECRYPT_PLACEHOLDER.to_string()),
            Some(NoteText::Skipped(_)) | None => None,
        };

        Self {
            note_id: note.note_id,
            image_keys: note.image_keys,
            text_keys: note.text_keys,
            text,
        }
    }
}

/// Lists and decrypts stored notes
pub struct NoteReader {
    secrets: Arc<dyn SecretResolver>,
    store: Arc<dyn ObjectStore>,
    cipher: Arc<dyn NoteCipher>,
}

impl NoteReader {
    #[must_use]
    pub fn new(
        secrets: Arc<dyn SecretResolver>,
        store: Arc<dyn ObjectStore>,
        cipher: Arc<dyn NoteCipher>,
    ) -> Self {
        Self {
            secrets,
            store,
            cipher,
        }
    }

    /// Rebuilds every note under the root prefix
    ///
    /// Only the first text key of a note is read. Text failures are recorded on
    /// the note and never abort the listing.
    ///
    /// # Errors
    ///
    /// - `NoteError::Secrets` - the bucket could not be resolved
    /// - `NoteError::Storage` - the listing call failed
    #[instrument(skip_all)]
    pub async fn read(&self) -> NoteResult<Vec<Note>> {
        let secrets = self.secrets.resolve().await?;

        let keys = self
            .store
            .list_keys(&secrets.bucket, NOTES_ROOT_PREFIX)
            .await?;
        tracing::debug!("Listed {} objects under {NOTES_ROOT_PREFIX}", keys.len());

        let mut notes: Vec<Note> = group_keys_by_note_id(&keys)
            .into_iter()
            .map(Note::from)
            .collect();

        for note in &mut notes {
            if let Some(text_key) = note.text_keys.first() {
                note.text = Some(self.load_text(&secrets.bucket, text_key).await);
            }
        }

        Ok(notes)
    }

    async fn load_text(&self, bucket: &str, text_key: &str) -> NoteText {
        let ciphertext = match self.store.get_object(bucket, text_key).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Error fetching {text_key}: {e}");
                return NoteText::Failed(e.to_string());
            }
        };

        if ciphertext.is_empty() {
            tracing::error!("Object {text_key} has an empty body, skipping decryption");
            return NoteText::Skipped(format!("{text_key} has an empty body"));
        }
        tracing::debug!("Ciphertext length for {text_key}: {}", ciphertext.len());

        match self.cipher.decrypt(&ciphertext).await {
            Ok(plaintext) => NoteText::Decrypted(String::from_utf8_lossy(&plaintext).into_owned()),
            Err(e) => {
                tracing::error!("Error decrypting {text_key}: {e}");
                NoteText::Failed(e.to_string())
            }
        }
    }
}
