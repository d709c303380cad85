//! Rodio sound pool implementation
//!
//! Keeps encoded samples in a slot table and starts one rodio [`Sink`] per
//! play. Rodio supports WAV, OGG Vorbis, MP3, and FLAC.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use piano_audio::audio::{RodioSoundPool, SoundThread, SoundItem};
//! use piano_audio::config::PoolConfig;
//! use rodio::OutputStream;
//!
//! // The output stream is not `Send`; keep it alive on this thread
//! let (_stream, handle) = OutputStream::try_default().unwrap();
//! let pool = Arc::new(RodioSoundPool::new(handle, PoolConfig::default()));
//!
//! let middle_c = pool.load_file("resources/audio/39.wav".as_ref()).unwrap();
//!
//! let mut worker = SoundThread::with_defaults(pool.clone());
//! worker.start().unwrap();
//! worker.enqueue(SoundItem::play(middle_c, 0.8)).unwrap();
//! ```

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rodio::source::ChannelVolume;
use rodio::{Decoder, OutputStreamHandle, Sink, Source};

use super::{SoundPool, StreamId};
use crate::audio::asset::Sample;
use crate::audio::{AudioError, SoundId};
use crate::config::PoolConfig;

/// Slowest and fastest supported playback rate
const RATE_RANGE: (f32, f32) = (0.5, 2.0);

/// Most finite repeats appended for one play
const MAX_REPEATS: usize = 64;

/// Shared sample bytes readable through a [`Cursor`]
#[derive(Clone)]
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// One started playback
struct ActiveStream {
    id: StreamId,
    priority: i32,
    sink: Sink,
}

/// Mutable pool state, guarded by one lock
#[derive(Default)]
struct PoolState {
    samples: HashMap<SoundId, Sample>,
    streams: Vec<ActiveStream>,
    next_sound: u32,
    next_stream: u32,
}

impl PoolState {
    fn next_sound_id(&mut self) -> SoundId {
        // Ids start at 1 and are never reused
        self.next_sound = self.next_sound.wrapping_add(1);
        SoundId(self.next_sound)
    }

    fn next_stream_id(&mut self) -> StreamId {
        self.next_stream = self.next_stream.wrapping_add(1);
        StreamId(self.next_stream)
    }

    /// Drop sinks that have played to the end
    fn reap_finished(&mut self) {
        self.streams.retain(|stream| !stream.sink.empty());
    }
}

/// Pick the stream to stop so a new one with `priority` can start
///
/// `priorities` is in start order. The lowest priority loses, the oldest
/// among equals. A stream is only evicted if it does not outrank the new one.
fn pick_eviction(priorities: &[i32], priority: i32) -> Option<usize> {
    let (index, lowest) = priorities
        .iter()
        .enumerate()
        .min_by(|(ia, pa), (ib, pb)| pa.cmp(pb).then(ia.cmp(ib)))?;

    (*lowest <= priority).then_some(index)
}

/// Number of times a sample is appended, `None` for endless looping
///
/// `loop_count` counts extra repeats, so 0 plays once.
fn repeat_count(loop_count: i32) -> Option<usize> {
    let extra = usize::try_from(loop_count).ok()?;
    Some(extra.saturating_add(1).min(MAX_REPEATS))
}

/// Rodio-based sound pool
pub struct RodioSoundPool {
    /// Output stream handle for creating sinks; the stream itself is owned by the caller
    stream_handle: OutputStreamHandle,
    /// Maximum number of simultaneous streams
    max_streams: usize,
    state: Mutex<PoolState>,
}

impl RodioSoundPool {
    /// Create a pool playing through `stream_handle`
    pub fn new(stream_handle: OutputStreamHandle, config: PoolConfig) -> Self {
        Self {
            stream_handle,
            max_streams: config.max_streams.max(1),
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Preload a sample from encoded bytes
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the bytes are empty or not a known container
    pub fn load(&self, bytes: &[u8]) -> Result<SoundId, AudioError> {
        let sample = Sample::from_bytes(bytes)?;
        let mut state = self.state.lock();
        let id = state.next_sound_id();
        log::debug!("Loaded {:?} sample as {id}", sample.format());
        state.samples.insert(id, sample);
        Ok(id)
    }

    /// Preload a sample from a file
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `UnsupportedFormat` if the file is not a known container
    pub fn load_file(&self, path: &Path) -> Result<SoundId, AudioError> {
        let sample = Sample::from_file(path)?;
        let mut state = self.state.lock();
        let id = state.next_sound_id();
        log::debug!("Loaded {} as {id}", path.display());
        state.samples.insert(id, sample);
        Ok(id)
    }

    /// Check if a sample is loaded
    pub fn is_loaded(&self, sound_id: SoundId) -> bool {
        self.state.lock().samples.contains_key(&sound_id)
    }

    /// Number of streams that are still producing sound
    pub fn active_streams(&self) -> usize {
        let mut state = self.state.lock();
        state.reap_finished();
        state.streams.len()
    }

    /// Stop every playing stream
    pub fn stop_all(&self) {
        for stream in self.state.lock().streams.drain(..) {
            stream.sink.stop();
        }
    }

    /// Decode and queue a sample on a paused sink
    fn build_sink(
        &self,
        data: Arc<[u8]>,
        left: f32,
        right: f32,
        loop_count: i32,
        rate: f32,
    ) -> Result<Sink, AudioError> {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;
        sink.pause();

        let decoder = Decoder::new(Cursor::new(SharedBytes(data)))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {e}")))?;

        let source = ChannelVolume::new(decoder, vec![left, right])
            .speed(rate)
            .buffered();

        match repeat_count(loop_count) {
            None => sink.append(source.repeat_infinite()),
            Some(times) => {
                if times == MAX_REPEATS {
                    log::debug!("Loop count {loop_count} capped at {MAX_REPEATS} repeats");
                }
                for _ in 0..times {
                    sink.append(source.clone());
                }
            }
        }

        Ok(sink)
    }
}

impl SoundPool for RodioSoundPool {
    fn play(
        &self,
        sound_id: SoundId,
        left: f32,
        right: f32,
        priority: i32,
        loop_count: i32,
        rate: f32,
    ) -> Result<StreamId, AudioError> {
        let data = self
            .state
            .lock()
            .samples
            .get(&sound_id)
            .map(Sample::shared_data)
            .ok_or(AudioError::UnknownSound(sound_id))?;

        // Decoding happens outside the lock; nothing is evicted unless it succeeds
        let sink = self.build_sink(
            data,
            left.clamp(0.0, 1.0),
            right.clamp(0.0, 1.0),
            loop_count,
            rate.clamp(RATE_RANGE.0, RATE_RANGE.1),
        )?;

        let mut state = self.state.lock();
        state.reap_finished();
        if state.streams.len() >= self.max_streams {
            let priorities: Vec<i32> = state.streams.iter().map(|s| s.priority).collect();
            let Some(index) = pick_eviction(&priorities, priority) else {
                sink.stop();
                return Err(AudioError::NoFreeStream(priority));
            };
            let evicted = state.streams.remove(index);
            log::debug!("Evicting stream {:?} (priority {})", evicted.id, evicted.priority);
            evicted.sink.stop();
        }

        let id = state.next_stream_id();
        sink.play();
        state.streams.push(ActiveStream { id, priority, sink });
        Ok(id)
    }

    fn unload(&self, sound_id: SoundId) -> bool {
        let removed = self.state.lock().samples.remove(&sound_id).is_some();
        if removed {
            log::debug!("Unloaded {sound_id}");
        }
        removed
    }
}

impl Drop for RodioSoundPool {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::OutputStream;

    #[test]
    fn test_eviction_prefers_lowest_priority() {
        assert_eq!(pick_eviction(&[2, 0, 1], 1), Some(1));
    }

    #[test]
    fn test_eviction_prefers_oldest_among_equals() {
        assert_eq!(pick_eviction(&[1, 0, 0], 0), Some(1));
    }

    #[test]
    fn test_eviction_refuses_higher_priority() {
        assert_eq!(pick_eviction(&[3, 2], 1), None);
        assert_eq!(pick_eviction(&[], 1), None);
    }

    #[test]
    fn test_repeat_count() {
        assert_eq!(repeat_count(0), Some(1));
        assert_eq!(repeat_count(2), Some(3));
        assert_eq!(repeat_count(-1), None);
        assert_eq!(repeat_count(i32::MAX), Some(MAX_REPEATS));
    }

    /// One second of 16-bit mono silence as a WAV file
    fn silent_wav() -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let data_len: u32 = sample_rate * 2;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(bytes.len() + data_len as usize, 0);
        bytes
    }

    #[test]
    fn test_undecodable_sample_keeps_playing_streams() {
        // May fail in CI/test environments without audio device
        if let Ok((_stream, handle)) = OutputStream::try_default() {
            let pool = RodioSoundPool::new(handle, PoolConfig { max_streams: 1 });
            let good = pool.load(&silent_wav()).unwrap();
            let broken = pool.load(b"RIFF....WAVE").unwrap();

            pool.play(good, 1.0, 1.0, 0, -1, 1.0).unwrap();
            assert_eq!(pool.active_streams(), 1);

            let result = pool.play(broken, 1.0, 1.0, 5, 0, 1.0);
            assert!(matches!(result, Err(AudioError::PlaybackFailed(_))));
            assert_eq!(pool.active_streams(), 1);
        }
    }

    #[test]
    fn test_load_and_unload() {
        // May fail in CI/test environments without audio device
        if let Ok((_stream, handle)) = OutputStream::try_default() {
            let pool = RodioSoundPool::new(handle, PoolConfig::default());

            let first = pool.load(b"RIFF....WAVE").unwrap();
            let second = pool.load(b"OggS....").unwrap();
            assert_ne!(first, second);
            assert!(pool.is_loaded(first));

            assert!(pool.unload(first));
            assert!(!pool.is_loaded(first));
            assert!(!pool.unload(first));
        }
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        if let Ok((_stream, handle)) = OutputStream::try_default() {
            let pool = RodioSoundPool::new(handle, PoolConfig::default());
            assert!(matches!(pool.load(b"????"), Err(AudioError::UnsupportedFormat(_))));
        }
    }

    #[test]
    fn test_play_unknown_sound() {
        if let Ok((_stream, handle)) = OutputStream::try_default() {
            let pool = RodioSoundPool::new(handle, PoolConfig::default());
            let result = pool.play(SoundId(42), 1.0, 1.0, 0, 0, 1.0);
            assert!(matches!(result, Err(AudioError::UnknownSound(SoundId(42)))));
            assert_eq!(pool.active_streams(), 0);
        }
    }
}
