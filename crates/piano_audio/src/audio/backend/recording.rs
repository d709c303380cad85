//! Headless sound pool that records every call
//!
//! Used by the test suite and by `--dry-run` front ends where no output
//! device is available.

use super::{SoundPool, StreamId};
use crate::audio::{AudioError, SoundId};
use parking_lot::Mutex;

/// Arguments of one `play` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayCall {
    /// Requested sample
    pub sound_id: SoundId,
    /// Left gain
    pub left: f32,
    /// Right gain
    pub right: f32,
    /// Stream priority
    pub priority: i32,
    /// Loop count
    pub loop_count: i32,
    /// Playback rate
    pub rate: f32,
}

/// One recorded facility call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolCall {
    /// `play` was called
    Play(PlayCall),
    /// `unload` was called
    Unload(SoundId),
}

/// Sound pool that plays nothing and remembers what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingSoundPool {
    calls: Mutex<Vec<PoolCall>>,
}

impl RecordingSoundPool {
    /// Create an empty recording pool
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<PoolCall> {
        self.calls.lock().clone()
    }

    /// Only the `play` calls, in order
    pub fn plays(&self) -> Vec<PlayCall> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PoolCall::Play(play) => Some(*play),
                PoolCall::Unload(_) => None,
            })
            .collect()
    }

    /// Only the `unload` calls, in order
    pub fn unloads(&self) -> Vec<SoundId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PoolCall::Unload(id) => Some(*id),
                PoolCall::Play(_) => None,
            })
            .collect()
    }
}

impl SoundPool for RecordingSoundPool {
    fn play(
        &self,
        sound_id: SoundId,
        left: f32,
        right: f32,
        priority: i32,
        loop_count: i32,
        rate: f32,
    ) -> Result<StreamId, AudioError> {
        let mut calls = self.calls.lock();
        calls.push(PoolCall::Play(PlayCall {
            sound_id,
            left,
            right,
            priority,
            loop_count,
            rate,
        }));
        log::trace!("recorded play of {sound_id}");
        Ok(StreamId(u32::try_from(calls.len()).unwrap_or(u32::MAX)))
    }

    fn unload(&self, sound_id: SoundId) -> bool {
        self.calls.lock().push(PoolCall::Unload(sound_id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let pool = RecordingSoundPool::new();
        pool.play(SoundId(1), 0.5, 0.5, 0, 0, 1.0).unwrap();
        pool.unload(SoundId(1));
        pool.play(SoundId(2), 1.0, 0.0, 3, -1, 2.0).unwrap();

        let calls = pool.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], PoolCall::Unload(SoundId(1))));
        assert_eq!(pool.unloads(), vec![SoundId(1)]);

        let plays = pool.plays();
        assert_eq!(plays.len(), 2);
        assert_eq!(plays[1].sound_id, SoundId(2));
        assert_eq!(plays[1].loop_count, -1);
    }

    #[test]
    fn test_stream_ids_increase() {
        let pool = RecordingSoundPool::new();
        let first = pool.play(SoundId(1), 1.0, 1.0, 0, 0, 1.0).unwrap();
        let second = pool.play(SoundId(1), 1.0, 1.0, 0, 0, 1.0).unwrap();
        assert!(second > first);
    }
}
