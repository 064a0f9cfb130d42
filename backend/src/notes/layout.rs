//! Storage key layout of notes
//!
//! ```text
//! uploads/<note id>/note.txt    ciphertext blob
//! uploads/<note id>/image.jpg   raw image bytes
//! ```

use std::collections::HashMap;

use jotnook_types::{timestamp_folder_name, Clock};

pub use jotnook_types::NOTES_ROOT_PREFIX;

/// Object name of a note's encrypted text
pub const TEXT_OBJECT_NAME: &str = "note.txt";

/// Object name of a note's image
pub const IMAGE_OBJECT_NAME: &str = "image.jpg";

/// Suffix of keys grouped as note texts
pub const TEXT_SUFFIX: &str = ".txt";

/// Suffix of keys grouped as note images
pub const IMAGE_SUFFIX: &str = ".jpg";

/// Text reported for a note whose ciphertext could not be decrypted
pub const DECRYPT_PLACEHOLDER: &str = "[Error decrypting note]";

/// Prefix a note's objects are written under
///
/// A non-empty `folder_name` is used verbatim. Otherwise the prefix is derived
/// from the clock, so two notes created in the same millisecond collide.
#[must_use]
pub fn note_prefix(folder_name: Option<&str>, clock: &dyn Clock) -> String {
    match folder_name {
        Some(folder) if !folder.is_empty() => folder.to_string(),
        _ => timestamp_folder_name(clock.now_millis()),
    }
}

#[must_use]
pub fn text_key(prefix: &str) -> String {
    format!("{prefix}/{TEXT_OBJECT_NAME}")
}

#[must_use]
pub fn image_key(prefix: &str) -> String {
    format!("{prefix}/{IMAGE_OBJECT_NAME}")
}

/// Keys found under one note id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteGroup {
    pub note_id: String,
    pub image_keys: Vec<String>,
    pub text_keys: Vec<String>,
}

/// Groups listed keys by their second path segment
///
/// Groups come out in order of first appearance. A group is opened for every
/// key with a non-empty second segment, even when the key itself is neither an
/// image nor a text and is dropped.
pub fn group_keys_by_note_id<I, S>(keys: I) -> Vec<NoteGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<NoteGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for key in keys {
        let key = key.as_ref();
        let Some(note_id) = key.split('/').nth(1).filter(|id| !id.is_empty()) else {
            continue;
        };

        let position = *positions.entry(note_id.to_string()).or_insert_with(|| {
            groups.push(NoteGroup {
                note_id: note_id.to_string(),
                ..NoteGroup::default()
            });
            groups.len() - 1
        });
        let group = &mut groups[position];

        if key.ends_with(IMAGE_SUFFIX) {
            group.image_keys.push(key.to_string());
        } else if key.ends_with(TEXT_SUFFIX) {
            group.text_keys.push(key.to_string());
        }
    }

    groups
}
