//! Audio module - the resource provider the playback session drives
//!
//! A provider turns a preview uri into a live [`AudioResource`]. The session
//! owns at most one resource at a time and releases it before acquiring the
//! next one. Resources report progress through a [`StatusSender`] handed to
//! them at acquisition.

mod rodio_backend;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

pub use rodio_backend::RodioProvider;

/// Status report pushed by a live resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub position_ms: u64,
    pub is_playing: bool,
    pub did_finish: bool,
}

/// Seek counter shared by both ends of a status channel.
///
/// Reports are stamped with the value current when they are sent, so the
/// receiver can tell reports made before a seek from those made after it.
#[derive(Clone, Debug, Default)]
pub struct SeekEpoch(Arc<AtomicU64>);

impl SeekEpoch {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Marks every report sent so far as stale
    pub fn advance(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// Sending half handed to a resource at acquisition
#[derive(Clone, Debug)]
pub struct StatusSender {
    tx: mpsc::UnboundedSender<(u64, StatusUpdate)>,
    epoch: SeekEpoch,
}

impl StatusSender {
    pub fn send(&self, status: StatusUpdate) -> Result<(), SendError<StatusUpdate>> {
        self.tx
            .send((self.epoch.current(), status))
            .map_err(|SendError((_, status))| SendError(status))
    }
}

#[derive(Debug)]
pub struct StatusReceiver {
    rx: mpsc::UnboundedReceiver<(u64, StatusUpdate)>,
}

impl StatusReceiver {
    /// Next report with the epoch it was sent under
    pub async fn recv(&mut self) -> Option<(u64, StatusUpdate)> {
        self.rx.recv().await
    }
}

pub fn status_channel() -> (StatusSender, StatusReceiver, SeekEpoch) {
    let (tx, rx) = mpsc::unbounded_channel();
    let epoch = SeekEpoch::default();
    (
        StatusSender {
            tx,
            epoch: epoch.clone(),
        },
        StatusReceiver { rx },
        epoch,
    )
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to fetch audio: {0}")]
    Fetch(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Seek failed: {0}")]
    Seek(String),
}

#[async_trait]
pub trait AudioProvider: Send + Sync {
    /// Loads the audio at `uri`. The returned resource starts paused.
    async fn acquire(&self, uri: &str, updates: StatusSender) -> Result<Box<dyn AudioResource>, AudioError>;
}

#[async_trait]
pub trait AudioResource: Send + Sync {
    async fn play(&mut self) -> Result<(), AudioError>;

    async fn pause(&mut self) -> Result<(), AudioError>;

    /// Halts output and rewinds; the resource stays loaded
    async fn stop(&mut self) -> Result<(), AudioError>;

    async fn seek(&mut self, position_ms: u64) -> Result<(), AudioError>;

    /// Current native status, polled by the session ticker
    async fn status(&self) -> Result<StatusUpdate, AudioError>;

    /// Frees the output; the resource is unusable afterwards
    async fn release(&mut self) -> Result<(), AudioError>;
}
