//! Piano notes
//!
//! Notes are numbered keys; the pitch class is the key number modulo 12,
//! with class 0 being A.

use std::fmt;
use std::str::FromStr;

/// Number of pitch classes in an octave
pub const PITCH_CLASSES: i32 = 12;

/// Pitch class names, indexed by `note % 12`
pub const PITCH_NAMES: [&str; 12] = [
    "A", "A Sharp", "B", "C", "C Sharp", "D", "D Sharp", "E", "F", "F Sharp", "G", "G Sharp",
];

/// Error parsing a [`Note`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("not a note: {0:?}")]
pub struct NoteParseError(pub String);

/// A key on the piano
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Note(i32);

impl Note {
    /// Middle C, the boundary between bass and treble clef
    pub const MIDDLE_C: Self = Self(39);
    /// Distance from middle C covered by the quiz
    pub const C_RANGE: i32 = 20;
    /// Lowest note the quiz picks
    pub const LOWEST: Self = Self(Self::MIDDLE_C.0 - Self::C_RANGE);
    /// Highest note the quiz picks
    pub const HIGHEST: Self = Self(Self::MIDDLE_C.0 + Self::C_RANGE);

    /// Create a note from its key number
    pub const fn new(index: i32) -> Self {
        Self(index)
    }

    /// Key number
    pub const fn index(self) -> i32 {
        self.0
    }

    /// Pitch class, 0 (A) to 11 (G Sharp)
    pub const fn pitch_class(self) -> i32 {
        self.0.rem_euclid(PITCH_CLASSES)
    }

    /// Pitch class name, e.g. "C Sharp"
    #[allow(clippy::cast_sign_loss)]
    pub const fn name(self) -> &'static str {
        PITCH_NAMES[self.pitch_class() as usize]
    }

    /// Check if this is a black key
    pub const fn is_sharp(self) -> bool {
        matches!(self.pitch_class(), 1 | 4 | 6 | 9 | 11)
    }

    /// Check if this note is written in the bass clef
    pub const fn is_in_bass(self) -> bool {
        self.0 < Self::MIDDLE_C.0
    }

    /// Check if two notes share a pitch class
    pub const fn same_pitch_class(self, other: Self) -> bool {
        self.pitch_class() == other.pitch_class()
    }

    /// Move by whole octaves into the other clef
    ///
    /// Bass notes move up to the first octave at or above middle C, treble
    /// notes move down to the first octave below it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn swap_clef(self) -> Self {
        // Lowest key of the target octave
        let base = if self.is_in_bass() {
            Self::MIDDLE_C.0
        } else {
            Self::MIDDLE_C.0 - PITCH_CLASSES
        };
        let offset = (self.0 as i64 - base as i64).rem_euclid(PITCH_CLASSES as i64);
        Self(base + offset as i32)
    }

    /// Count black keys between two notes, both ends included
    pub fn sharps_between(a: Self, b: Self) -> usize {
        let (low, high) = if a <= b { (a.0, b.0) } else { (b.0, a.0) };
        (low..=high).filter(|&n| Self(n).is_sharp()).count()
    }

    /// Note of the given pitch class in the octave starting at middle C
    fn in_middle_octave(pitch_class: i32) -> Self {
        let offset = (pitch_class - Self::MIDDLE_C.pitch_class()).rem_euclid(PITCH_CLASSES);
        Self(Self::MIDDLE_C.0 + offset)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Parse a key number (`"39"`) or a pitch name (`"C Sharp"`, `"c#"`)
    ///
    /// Pitch names resolve to the octave starting at middle C.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i32>() {
            return Ok(Self(index));
        }

        let normalized = trimmed.to_ascii_lowercase().replace('#', " sharp");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        PITCH_NAMES
            .iter()
            .position(|name| name.to_ascii_lowercase() == normalized)
            .and_then(|class| i32::try_from(class).ok())
            .map(Self::in_middle_octave)
            .ok_or_else(|| NoteParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Note::MIDDLE_C.name(), "C");
        assert_eq!(Note::new(0).name(), "A");
        assert_eq!(Note::new(40).name(), "C Sharp");
        assert_eq!(Note::new(47).name(), "G Sharp");
        assert_eq!(Note::new(48).name(), "A");
        assert_eq!(Note::new(51).name(), "C");
    }

    #[test]
    fn test_sharps() {
        let sharps: Vec<i32> = (0..12).filter(|&n| Note::new(n).is_sharp()).collect();
        assert_eq!(sharps, vec![1, 4, 6, 9, 11]);
        assert!(Note::new(40).is_sharp());
        assert!(!Note::MIDDLE_C.is_sharp());
    }

    #[test]
    fn test_clef_boundary() {
        assert!(Note::new(38).is_in_bass());
        assert!(!Note::MIDDLE_C.is_in_bass());
    }

    #[test]
    fn test_swap_clef() {
        // Treble G (46) drops to bass G (34)
        assert_eq!(Note::new(46).swap_clef(), Note::new(34));
        // Bass G goes back up
        assert_eq!(Note::new(34).swap_clef(), Note::new(46));
        // Middle C is treble; it swaps to the C below
        assert_eq!(Note::MIDDLE_C.swap_clef(), Note::new(27));
        // Far notes move by several octaves
        assert_eq!(Note::new(5).swap_clef(), Note::new(41));
        assert!(Note::new(59).swap_clef().is_in_bass());
    }

    #[test]
    fn test_swap_clef_extreme_keys() {
        assert_eq!(Note::new(i32::MAX).swap_clef(), Note::new(31));
        assert_eq!(Note::new(i32::MIN).swap_clef(), Note::new(40));
    }

    #[test]
    fn test_swap_clef_keeps_pitch_class() {
        for n in Note::LOWEST.index()..=Note::HIGHEST.index() {
            let note = Note::new(n);
            let swapped = note.swap_clef();
            assert!(note.same_pitch_class(swapped));
            assert_ne!(note.is_in_bass(), swapped.is_in_bass());
        }
    }

    #[test]
    fn test_sharps_between() {
        // A..=G Sharp covers all five black keys
        assert_eq!(Note::sharps_between(Note::new(0), Note::new(11)), 5);
        assert_eq!(Note::sharps_between(Note::new(11), Note::new(0)), 5);
        assert_eq!(Note::sharps_between(Note::MIDDLE_C, Note::MIDDLE_C), 0);
        assert_eq!(Note::sharps_between(Note::new(40), Note::new(40)), 1);
    }

    #[test]
    fn test_range() {
        assert_eq!(Note::LOWEST, Note::new(19));
        assert_eq!(Note::HIGHEST, Note::new(59));
    }

    #[test]
    fn test_parse() {
        assert_eq!("39".parse::<Note>().unwrap(), Note::MIDDLE_C);
        assert_eq!("C".parse::<Note>().unwrap(), Note::MIDDLE_C);
        assert_eq!("c sharp".parse::<Note>().unwrap(), Note::new(40));
        assert_eq!("C#".parse::<Note>().unwrap(), Note::new(40));
        assert_eq!("  G  Sharp ".parse::<Note>().unwrap(), Note::new(47));
        assert_eq!("A".parse::<Note>().unwrap(), Note::new(48));
        assert_eq!("B".parse::<Note>().unwrap(), Note::new(50));
        assert!("H".parse::<Note>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::MIDDLE_C.to_string(), "C (39)");
    }
}
