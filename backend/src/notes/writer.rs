use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jotnook_types::{Clock, SaveNoteRequest};
use tracing::instrument;

use super::{
    layout::{image_key, note_prefix, text_key},
    NoteError, NoteResult,
};
use crate::{
    note_cipher::{NoteCipher, MAX_PLAINTEXT_BYTES},
    note_storage::ObjectStore,
    secrets::SecretResolver,
};

/// A submission that passed validation, with the image already decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNote {
    pub text: String,
    pub image: Vec<u8>,
    pub folder_name: Option<String>,
}

impl TryFrom<SaveNoteRequest> for ValidatedNote {
    type Error = NoteError;

    fn try_from(request: SaveNoteRequest) -> NoteResult<Self> {
        let (Some(text), Some(image)) = (
            request.text.filter(|text| !text.is_empty()),
            request.image.filter(|image| !image.is_empty()),
        ) else {
            return Err(NoteError::InvalidInput(
                "The text or image data is missing.".to_string(),
            ));
        };

        if text.len() > MAX_PLAINTEXT_BYTES {
            return Err(NoteError::InvalidInput(format!(
                "The text exceeds {MAX_PLAINTEXT_BYTES} bytes."
            )));
        }

        let image = STANDARD
            .decode(image.trim())
            .map_err(|e| NoteError::InvalidInput(format!("The image is not valid base64: {e}")))?;

        Ok(Self {
            text,
            image,
            folder_name: request.folder_name.filter(|folder| !folder.is_empty()),
        })
    }
}

/// Where a note was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub prefix: String,
    pub text_key: String,
    pub image_key: String,
}

/// Encrypts and stores new notes
pub struct NoteWriter {
    secrets: Arc<dyn SecretResolver>,
    store: Arc<dyn ObjectStore>,
    cipher: Arc<dyn NoteCipher>,
    clock: Arc<dyn Clock>,
}

impl NoteWriter {
    #[must_use]
    pub fn new(
        secrets: Arc<dyn SecretResolver>,
        store: Arc<dyn ObjectStore>,
        cipher: Arc<dyn NoteCipher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            secrets,
            store,
            cipher,
            clock,
        }
    }

    /// Stores a note as a ciphertext object followed by an image object
    ///
    /// The two writes are not atomic. If the image write fails the text object
    /// stays in place, and a note written to an existing prefix replaces it.
    ///
    /// # Errors
    ///
    /// - `NoteError::Secrets` - the bucket and key id could not be resolved
    /// - `NoteError::Cipher` - the key service failed to encrypt the text
    /// - `NoteError::Storage` - either object write failed
    #[instrument(skip_all, fields(folder_name = ?note.folder_name))]
    pub async fn write(&self, note: ValidatedNote) -> NoteResult<WriteReceipt> {
        let secrets = self.secrets.resolve().await?;

        let ciphertext = self
            .cipher
            .encrypt(&secrets.key_id, note.text.as_bytes())
            .await?;

        let prefix = note_prefix(note.folder_name.as_deref(), self.clock.as_ref());
        let text_key = text_key(&prefix);
        let image_key = image_key(&prefix);

        self.store
            .put_object(
                &secrets.bucket,
                &text_key,
                ciphertext,
                mime::APPLICATION_OCTET_STREAM.as_ref(),
            )
            .await?;
        tracing::debug!("Stored note text at {text_key}");

        self.store
            .put_object(
                &secrets.bucket,
                &image_key,
                note.image,
                mime::IMAGE_JPEG.as_ref(),
            )
            .await?;
        tracing::debug!("Stored note image at {image_key}");

        tracing::info!("Saved note under {prefix}");

        Ok(WriteReceipt {
            prefix,
            text_key,
            image_key,
        })
    }
}
