//! Items carried by the sound queue

use std::fmt;

/// Handle into a sound pool's table of preloaded samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u32);

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Request to play one preloaded sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    /// Sample to play
    pub sound_id: SoundId,
    /// Gain applied to both left and right channels (expected 0.0 to 1.0)
    pub volume: f32,
}

/// Unit of work for the [`SoundThread`](super::SoundThread)
///
/// Produced on any thread, consumed exactly once by the worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundItem {
    /// Play a sample
    Play(PlayRequest),
    /// Terminate the worker once this item is reached
    Stop,
}

impl SoundItem {
    /// Create a play request
    ///
    /// No validation happens here; the queue applies the configured
    /// [`VolumePolicy`](super::VolumePolicy) on enqueue.
    pub const fn play(sound_id: SoundId, volume: f32) -> Self {
        Self::Play(PlayRequest { sound_id, volume })
    }

    /// Create the termination signal
    pub const fn stop() -> Self {
        Self::Stop
    }

    /// Check if this is the termination signal
    pub const fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Get the play request if this item carries one
    pub const fn as_play(&self) -> Option<PlayRequest> {
        match self {
            Self::Play(request) => Some(*request),
            Self::Stop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_constructor() {
        let item = SoundItem::play(SoundId(3), 0.8);
        assert!(!item.is_stop());

        let request = item.as_play().unwrap();
        assert_eq!(request.sound_id, SoundId(3));
        assert_eq!(request.volume, 0.8);
    }

    #[test]
    fn test_stop_constructor() {
        let item = SoundItem::stop();
        assert!(item.is_stop());
        assert!(item.as_play().is_none());
    }

    #[test]
    fn test_play_does_not_validate() {
        // Out-of-range values are only checked at the queue boundary
        let item = SoundItem::play(SoundId(0), 7.5);
        assert_eq!(item.as_play().map(|r| r.volume), Some(7.5));
    }

    #[test]
    fn test_sound_id_display() {
        assert_eq!(SoundId(12).to_string(), "#12");
    }
}
