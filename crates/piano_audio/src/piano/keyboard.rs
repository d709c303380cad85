//! Mapping from piano keys to preloaded sounds

use std::collections::BTreeMap;

use super::Note;
use crate::audio::{SoundId, SoundItem};

/// Sounds loaded for each playable key
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    keys: BTreeMap<Note, SoundId>,
}

impl Keyboard {
    /// Create a keyboard with no sounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a loaded sound to a key, returning the previous binding
    pub fn bind(&mut self, note: Note, sound_id: SoundId) -> Option<SoundId> {
        self.keys.insert(note, sound_id)
    }

    /// Remove a key's binding
    pub fn unbind(&mut self, note: Note) -> Option<SoundId> {
        self.keys.remove(&note)
    }

    /// Sound bound to a key
    pub fn sound_for(&self, note: Note) -> Option<SoundId> {
        self.keys.get(&note).copied()
    }

    /// Build the play request for pressing a key
    ///
    /// Returns `None` for keys without a sound.
    pub fn press(&self, note: Note, volume: f32) -> Option<SoundItem> {
        self.sound_for(note).map(|id| SoundItem::play(id, volume))
    }

    /// Bound keys in ascending order
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.keys.keys().copied()
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no key is bound
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
