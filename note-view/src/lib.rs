//! Jotnook note view
//!
//! The notes screen as a view-model: it loads the note list from `/fetch`,
//! renders cards, and submits new notes to `/upload`. Rendering itself is left
//! to whatever UI layer drives it.

pub mod api;
pub mod error;
pub mod view;

pub use api::{HttpNotesApi, NotesApi};
pub use error::{ApiError, ApiResult};
pub use view::{NoteCard, NoteView, SaveOutcome};
