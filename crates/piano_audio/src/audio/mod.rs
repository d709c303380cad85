//! Audio system
//!
//! A single background [`SoundThread`] drains a queue of [`SoundItem`]s and
//! forwards play requests to a shared [`SoundPool`] facility. The facility
//! owns decoding and mixing; this module only schedules calls into it.

pub mod asset;
pub mod backend;
pub mod sound_item;
pub mod sound_thread;
pub mod volume;

pub use backend::recording::{PlayCall, PoolCall, RecordingSoundPool};
pub use backend::rodio_pool::RodioSoundPool;
pub use backend::{SoundPool, StreamId};
pub use sound_item::{PlayRequest, SoundId, SoundItem};
pub use sound_thread::{SoundSender, SoundThread, TerminationReason, WorkerExit, WorkerState};
pub use volume::VolumePolicy;

/// Audio system errors
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// Backend failed to initialize
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Facility could not start a stream
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Volume outside of [0, 1] or not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// No sample is loaded under this id
    #[error("Unknown sound: {0}")]
    UnknownSound(SoundId),

    /// Sample bytes are empty or not a recognized container
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// All streams are busy with higher priority sounds
    #[error("No free stream for priority {0}")]
    NoFreeStream(i32),

    /// Bounded queue is at capacity
    #[error("Sound queue is full (capacity {0})")]
    QueueFull(usize),

    /// Worker has already terminated
    #[error("Sound worker has stopped")]
    WorkerStopped,

    /// `start` was called twice
    #[error("Sound worker already started")]
    AlreadyStarted,

    /// `join` was called before `start`
    #[error("Sound worker was never started")]
    NotStarted,

    /// OS refused to spawn the worker thread
    #[error("Failed to spawn sound worker: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// Worker thread panicked
    #[error("Sound worker panicked")]
    WorkerPanicked,

    /// IO error while reading samples
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
