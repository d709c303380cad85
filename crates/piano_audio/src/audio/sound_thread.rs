//! Background sound worker
//!
//! One dedicated thread drains a FIFO queue of [`SoundItem`]s and forwards
//! each play request to the shared [`SoundPool`]. Producers on any thread
//! only ever enqueue; the queue is the sole point of coordination.
//!
//! # Lifecycle
//!
//! ```text
//! Pending --start()--> Running --(stop item | interrupt | all producers gone)--> Stopped
//! ```
//!
//! The worker is not restartable. Whoever joins it learns why it ended
//! through [`WorkerExit::reason`].
//!
//! # Queue policy
//!
//! - Unbounded by default: enqueue never blocks and never fails for capacity.
//!   A bounded queue can be configured; a full queue rejects the item.
//! - A stop item is handled in FIFO order, so earlier play requests are played.
//! - Once the worker is stopped, enqueue fails with [`AudioError::WorkerStopped`].
//!   Items that were queued behind the stop item are discarded and counted.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;

use super::{AudioError, PlayRequest, SoundId, SoundItem, SoundPool, VolumePolicy};
use crate::config::WorkerConfig;

/// Fixed arguments for every play issued by the worker
const PLAY_PRIORITY: i32 = 0;
const PLAY_LOOP_COUNT: i32 = 0;
const PLAY_RATE: f32 = 1.0;

/// Run state of the sound worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, thread not started yet
    Pending,
    /// Thread is draining the queue
    Running,
    /// Thread has ended (terminal)
    Stopped,
}

/// Why the worker ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A stop item was dequeued
    Stopped,
    /// [`SoundThread::interrupt`] woke the worker
    Interrupted,
    /// Every producer handle was dropped
    ChannelClosed,
}

/// Summary returned by [`SoundThread::join`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    /// Why the loop ended
    pub reason: TerminationReason,
    /// Play requests the pool accepted
    pub played: u64,
    /// Play requests the pool rejected
    pub failed: u64,
    /// Items still queued when the worker stopped
    pub discarded: usize,
}

/// Cloneable producer handle for the sound queue
#[derive(Clone)]
pub struct SoundSender {
    items: Sender<SoundItem>,
    state: Arc<RwLock<WorkerState>>,
    volume_policy: VolumePolicy,
    capacity: Option<usize>,
}

impl SoundSender {
    /// Append an item to the queue without blocking
    ///
    /// # Errors
    /// - `WorkerStopped` if the worker has already terminated
    /// - `InvalidVolume` if the volume policy rejects a play request
    /// - `QueueFull` if a bounded queue is at capacity
    pub fn enqueue(&self, item: SoundItem) -> Result<(), AudioError> {
        let item = match item {
            SoundItem::Play(PlayRequest { sound_id, volume }) => {
                SoundItem::play(sound_id, self.volume_policy.apply(volume)?)
            }
            SoundItem::Stop => SoundItem::Stop,
        };

        // Held across the send so the worker cannot stop in between
        let state = self.state.read();
        if *state == WorkerState::Stopped {
            return Err(AudioError::WorkerStopped);
        }

        self.items.try_send(item).map_err(|e| match e {
            TrySendError::Full(_) => AudioError::QueueFull(self.capacity.unwrap_or_default()),
            TrySendError::Disconnected(_) => AudioError::WorkerStopped,
        })?;

        log::trace!("Queued {item:?}");
        Ok(())
    }

    /// Number of items waiting in the queue
    pub fn queued(&self) -> usize {
        self.items.len()
    }
}

/// Consumer side, moved onto the worker thread
struct Worker {
    pool: Arc<dyn SoundPool>,
    items: Receiver<SoundItem>,
    interrupts: Receiver<()>,
    state: Arc<RwLock<WorkerState>>,
}

impl Worker {
    fn run(&mut self) -> WorkerExit {
        log::info!("Sound worker started");

        let mut played = 0;
        let mut failed = 0;

        let reason = 'drain: loop {
            if self.interrupts.try_recv().is_ok() {
                break 'drain TerminationReason::Interrupted;
            }

            select! {
                recv(self.items) -> item => match item {
                    Ok(SoundItem::Play(request)) => {
                        if self.play(request) {
                            played += 1;
                        } else {
                            failed += 1;
                        }
                    }
                    Ok(SoundItem::Stop) => break 'drain TerminationReason::Stopped,
                    Err(_) => break 'drain TerminationReason::ChannelClosed,
                },
                recv(self.interrupts) -> _ => break 'drain TerminationReason::Interrupted,
            }
        };

        let discarded = {
            let mut state = self.state.write();
            *state = WorkerState::Stopped;
            self.items.try_iter().count()
        };

        if discarded > 0 {
            log::debug!("Discarded {discarded} queued sound items");
        }
        log::info!("Sound worker stopped ({reason:?}, {played} played, {failed} failed)");

        WorkerExit {
            reason,
            played,
            failed,
            discarded,
        }
    }

    fn play(&self, request: PlayRequest) -> bool {
        let PlayRequest { sound_id, volume } = request;
        match self.pool.play(
            sound_id,
            volume,
            volume,
            PLAY_PRIORITY,
            PLAY_LOOP_COUNT,
            PLAY_RATE,
        ) {
            Ok(stream) => {
                log::trace!("Playing {sound_id} at {volume} on {stream:?}");
                true
            }
            Err(e) => {
                log::warn!("Failed to play {sound_id}: {e}");
                false
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Also reached when the loop unwinds
        *self.state.write() = WorkerState::Stopped;
    }
}

/// Dedicated thread that plays queued sounds
///
/// The sound pool is shared with the caller, who manages its lifetime; the
/// worker keeps it alive through its `Arc` for as long as the thread runs.
pub struct SoundThread {
    pool: Arc<dyn SoundPool>,
    thread_name: String,
    sender: Option<SoundSender>,
    interrupt: Sender<()>,
    state: Arc<RwLock<WorkerState>>,
    worker: Option<Worker>,
    handle: Option<JoinHandle<WorkerExit>>,
}

impl SoundThread {
    /// Create a worker for `pool`; the thread is not started yet
    pub fn new(pool: Arc<dyn SoundPool>, config: &WorkerConfig) -> Self {
        let capacity = config.queue_capacity.map(|n| n.max(1));
        let (items_tx, items_rx): (Sender<SoundItem>, Receiver<SoundItem>) =
            capacity.map_or_else(unbounded, bounded);
        let (interrupt_tx, interrupt_rx) = bounded(1);
        let state = Arc::new(RwLock::new(WorkerState::Pending));

        let sender = SoundSender {
            items: items_tx,
            state: Arc::clone(&state),
            volume_policy: config.volume_policy,
            capacity,
        };

        let worker = Worker {
            pool: Arc::clone(&pool),
            items: items_rx,
            interrupts: interrupt_rx,
            state: Arc::clone(&state),
        };

        Self {
            pool,
            thread_name: config.thread_name.clone(),
            sender: Some(sender),
            interrupt: interrupt_tx,
            state,
            worker: Some(worker),
            handle: None,
        }
    }

    /// Create a worker with the default configuration
    pub fn with_defaults(pool: Arc<dyn SoundPool>) -> Self {
        Self::new(pool, &WorkerConfig::default())
    }

    /// Spawn the worker thread
    ///
    /// # Errors
    /// - `AlreadyStarted` if called more than once
    /// - `ThreadSpawn` if the OS refuses the thread; the worker is then stopped
    pub fn start(&mut self) -> Result<(), AudioError> {
        let mut worker = self.worker.take().ok_or(AudioError::AlreadyStarted)?;
        *self.state.write() = WorkerState::Running;

        let handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || worker.run())
            .map_err(AudioError::ThreadSpawn)?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Append an item to the queue without blocking
    ///
    /// Items may be queued before [`start`](Self::start); they wait for the worker.
    ///
    /// # Errors
    /// See [`SoundSender::enqueue`]
    pub fn enqueue(&self, item: SoundItem) -> Result<(), AudioError> {
        self.sender
            .as_ref()
            .ok_or(AudioError::WorkerStopped)?
            .enqueue(item)
    }

    /// Get a producer handle for other threads
    ///
    /// Outstanding handles keep the queue open; see [`join`](Self::join).
    pub fn sender(&self) -> Option<SoundSender> {
        self.sender.clone()
    }

    /// Number of items waiting in the queue
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, SoundSender::queued)
    }

    /// Release a preloaded sound in the pool
    ///
    /// Goes straight to the pool without touching the queue, so it is valid
    /// before, during and after the worker's lifetime.
    pub fn unload_sound(&self, sound_id: SoundId) -> bool {
        let unloaded = self.pool.unload(sound_id);
        log::debug!("Unload {sound_id}: {unloaded}");
        unloaded
    }

    /// Wake the worker out of its wait and make it stop
    ///
    /// Items still queued are discarded. Interrupting before `start` makes
    /// the worker stop as soon as it starts.
    pub fn interrupt(&self) {
        // A pending interrupt is already enough
        let _ = self.interrupt.try_send(());
    }

    /// Current run state
    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    /// Wait for the worker to end
    ///
    /// Drops this handle's own producer first. Without a stop item or an
    /// interrupt the worker ends once every [`SoundSender`] clone is gone.
    ///
    /// # Errors
    /// - `NotStarted` if [`start`](Self::start) was never called
    /// - `WorkerPanicked` if the worker thread panicked
    pub fn join(mut self) -> Result<WorkerExit, AudioError> {
        let handle = self.handle.take().ok_or(AudioError::NotStarted)?;
        self.sender = None;
        handle.join().map_err(|_| AudioError::WorkerPanicked)
    }
}

impl Drop for SoundThread {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.interrupt();
            if handle.join().is_err() {
                log::error!("Sound worker panicked");
            }
        }
    }
}
