//! # Piano Audio
//!
//! Sound playback plumbing for a note-reading piano trainer.
//!
//! ## Features
//!
//! - **Sound Worker**: A dedicated background thread that drains a FIFO queue of sound requests
//! - **Sound Pool Abstraction**: Playback goes through a [`SoundPool`](audio::SoundPool) facility
//! - **Rodio Backend**: Preloaded samples played through `rodio` sinks
//! - **Note Model**: Pitch naming, clefs and a small note-guessing quiz
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use piano_audio::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = Arc::new(RecordingSoundPool::new());
//!     let mut worker = SoundThread::with_defaults(pool.clone());
//!     worker.start()?;
//!
//!     worker.enqueue(SoundItem::play(SoundId(3), 0.8))?;
//!     worker.enqueue(SoundItem::stop())?;
//!
//!     let exit = worker.join()?;
//!     assert_eq!(exit.reason, TerminationReason::Stopped);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod audio;
pub mod config;
pub mod foundation;
pub mod piano;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        audio::{
            AudioError, PlayRequest, RecordingSoundPool, RodioSoundPool, SoundId, SoundItem,
            SoundPool, SoundSender, SoundThread, StreamId, TerminationReason, VolumePolicy,
            WorkerExit, WorkerState,
        },
        config::{AudioConfig, Config, ConfigError, PoolConfig, SampleConfig, WorkerConfig},
        piano::{GuessOutcome, Keyboard, Note, NoteQuiz},
    };
}
