//! Sound pool implementations
//!
//! Platform-independent abstraction over the facility that preloads short
//! samples and mixes overlapping plays of them.

pub mod recording;
pub mod rodio_pool;

use crate::audio::{AudioError, SoundId};

/// Handle to one started playback, as returned by [`SoundPool::play`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u32);

/// Sound mixing facility shared between the worker and its callers
///
/// # Threading
/// Pools are called from the sound worker and from whichever thread calls
/// [`SoundThread::unload_sound`](crate::audio::SoundThread::unload_sound),
/// so implementations synchronize internally and take `&self`.
///
/// The pool's lifetime is managed by the caller. The worker only holds an
/// `Arc` to it and never initializes or tears it down.
pub trait SoundPool: Send + Sync {
    /// Start playing a preloaded sample
    ///
    /// * `left`, `right` - Per-channel gain (0.0 to 1.0)
    /// * `priority` - Higher priority streams win when streams run out
    /// * `loop_count` - 0 plays once, `n` repeats `n` more times, -1 loops forever
    /// * `rate` - Playback speed multiplier (1.0 is normal)
    fn play(
        &self,
        sound_id: SoundId,
        left: f32,
        right: f32,
        priority: i32,
        loop_count: i32,
        rate: f32,
    ) -> Result<StreamId, AudioError>;

    /// Release a preloaded sample, returns `false` if it was not loaded
    fn unload(&self, sound_id: SoundId) -> bool;
}
