//! Piano model
//!
//! Note naming and clefs, the note-reading quiz, and the mapping from keys
//! to preloaded sounds.

pub mod keyboard;
pub mod note;
pub mod quiz;

pub use keyboard::Keyboard;
pub use note::{Note, NoteParseError};
pub use quiz::{GuessOutcome, NoteQuiz};
