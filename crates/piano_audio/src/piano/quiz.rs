//! Note-reading quiz
//!
//! Shows one note at a time; the player answers by pressing a key.
//! A correct answer flips the note into the other clef, a wrong answer
//! moves the quiz to the key that was pressed.

use rand::Rng;

use super::Note;

/// Result of [`NoteQuiz::guess`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Pitch class matched
    Correct,
    /// Pitch class did not match
    Wrong {
        /// Note the quiz was showing
        expected: Note,
    },
}

/// Quiz state: the note currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteQuiz {
    note: Note,
}

impl NoteQuiz {
    /// Start the quiz on `note`
    pub const fn new(note: Note) -> Self {
        Self { note }
    }

    /// Note currently shown
    pub const fn note(&self) -> Note {
        self.note
    }

    /// Pick a new note with a different pitch class, staying in the same clef
    pub fn next_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Note {
        let was_bass = self.note.is_in_bass();
        let previous = self.note;

        let mut next = previous;
        while next.same_pitch_class(previous) {
            next = Note::new(rng.gen_range(Note::LOWEST.index()..=Note::HIGHEST.index()));
        }

        if was_bass != next.is_in_bass() {
            next = next.swap_clef();
        }

        self.note = next;
        next
    }

    /// Check a pressed key against the shown note
    pub fn guess(&mut self, pressed: Note) -> GuessOutcome {
        if self.note.same_pitch_class(pressed) {
            self.note = self.note.swap_clef();
            return GuessOutcome::Correct;
        }

        let expected = self.note;
        self.note = if expected.is_in_bass() == pressed.is_in_bass() {
            pressed
        } else {
            pressed.swap_clef()
        };
        GuessOutcome::Wrong { expected }
    }

    /// Show the current note in the other clef
    pub fn swap_clef(&mut self) {
        self.note = self.note.swap_clef();
    }

    /// Every note in range sharing the current pitch class and clef
    ///
    /// Middle C is always included when it shares the pitch class.
    pub fn octave_siblings(&self) -> Vec<Note> {
        let in_bass = self.note.is_in_bass();
        let mut siblings = Vec::new();

        let mut candidate = Note::new(self.note.pitch_class());
        while candidate <= Note::HIGHEST {
            let in_range = candidate >= Note::LOWEST && candidate.is_in_bass() == in_bass;
            if in_range || candidate == Note::MIDDLE_C {
                siblings.push(candidate);
            }
            candidate = Note::new(candidate.index() + super::note::PITCH_CLASSES);
        }

        siblings
    }
}

impl Default for NoteQuiz {
    fn default() -> Self {
        Self::new(Note::MIDDLE_C)
    }
}
