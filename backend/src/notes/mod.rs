//! Note persistence
//!
//! A note is two objects sharing a key prefix: the KMS ciphertext of its text
//! and the raw image. There is no index; the reader rebuilds every note from a
//! listing of the root prefix.

mod error;
pub mod layout;
mod reader;
mod writer;

pub use error::{NoteError, NoteResult};
pub use reader::{Note, NoteReader, NoteText};
pub use writer::{NoteWriter, ValidatedNote, WriteReceipt};
