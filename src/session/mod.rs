//! Playback session controller
//!
//! The session is the only owner of the current track, the audio resource
//! and the transport state. It is built once at startup, shared by `Arc`
//! with every screen, and torn down with [`PlaybackSession::shutdown`].
//! Screens observe it through a `watch` channel of [`SessionSnapshot`]s.
//!
//! Every operation takes the state lock for its whole duration, so a `play`
//! issued while another track is live always releases the old resource
//! before the new one is acquired.

mod ticker;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::audio::{AudioError, AudioProvider, AudioResource, SeekEpoch, StatusReceiver, StatusUpdate, status_channel};
use crate::model::{SessionSnapshot, Track, TransportState};

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Error playing track: {0}")]
    Acquire(#[source] AudioError),

    #[error("Playback command failed: {0}")]
    Transport(#[source] AudioError),
}

/// Timing parameters for a session
#[derive(Clone, Copy, Debug)]
pub struct PlaybackConfig {
    /// Nominal clip length; previews are capped, so this is not read from the audio
    pub duration: Duration,
    pub poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

struct LiveResource {
    resource: Box<dyn AudioResource>,
    listener: JoinHandle<()>,
    /// Advanced after every seek; pushed reports from before it are dropped
    epoch: SeekEpoch,
}

struct SessionState {
    current_track: Option<Track>,
    transport: TransportState,
    position_secs: f64,
    is_minimized: bool,
    seeking: bool,
    /// Set on natural completion; the next resume restarts from zero
    finished: bool,
    /// Bumped on every acquisition so late status updates from a released
    /// resource are dropped
    generation: u64,
    live: Option<LiveResource>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            current_track: None,
            transport: TransportState::Idle,
            position_secs: 0.0,
            is_minimized: false,
            seeking: false,
            finished: false,
            generation: 0,
            live: None,
        }
    }

    fn reset_to_idle(&mut self) {
        self.current_track = None;
        self.transport = TransportState::Idle;
        self.position_secs = 0.0;
        self.is_minimized = false;
        self.seeking = false;
        self.finished = false;
    }
}

/// State shared between the session handle and its background tasks
struct Shared {
    state: Mutex<SessionState>,
    snapshots: watch::Sender<SessionSnapshot>,
    duration_secs: f64,
}

impl Shared {
    fn publish(&self, state: &SessionState) {
        self.snapshots.send_replace(SessionSnapshot {
            current_track: state.current_track.clone(),
            transport: state.transport,
            position_secs: state.position_secs,
            duration_secs: self.duration_secs,
            is_minimized: state.is_minimized,
            seeking: state.seeking,
        });
    }

    /// Applies a pushed or polled status report.
    ///
    /// Ignored unless playing, and while a scrub is in progress so the
    /// user's drag value is not overwritten.
    fn apply_status(&self, state: &mut SessionState, status: StatusUpdate) {
        if state.transport != TransportState::Playing || state.seeking {
            return;
        }

        if status.did_finish {
            tracing::info!("Track finished");
            state.transport = TransportState::Paused;
            state.position_secs = self.duration_secs;
            state.finished = true;
        } else {
            let position = status.position_ms as f64 / 1000.0;
            state.position_secs = position.min(self.duration_secs);
        }
        self.publish(state);
    }
}

pub struct PlaybackSession {
    shared: Arc<Shared>,
    provider: Arc<dyn AudioProvider>,
    cancel: CancellationToken,
    ticker: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackSession {
    /// Creates the session and starts its position ticker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(provider: Arc<dyn AudioProvider>, config: PlaybackConfig) -> Arc<Self> {
        let duration_secs = config.duration.as_secs_f64();
        let (snapshots, _) = watch::channel(SessionSnapshot::idle(duration_secs));
        let shared = Arc::new(Shared {
            state: Mutex::new(SessionState::new()),
            snapshots,
            duration_secs,
        });

        let cancel = CancellationToken::new();
        let ticker = ticker::spawn(shared.clone(), config.poll_interval, cancel.clone());

        tracing::debug!(duration_secs, poll_ms = config.poll_interval.as_millis() as u64, "Playback session started");

        Arc::new(Self {
            shared,
            provider,
            cancel,
            ticker: std::sync::Mutex::new(Some(ticker)),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    pub fn duration_secs(&self) -> f64 {
        self.shared.duration_secs
    }

    /// Loads `track` and starts playing it, replacing whatever was loaded.
    ///
    /// The previous resource is always released first. On acquisition
    /// failure the session is left idle with no track.
    pub async fn play(&self, track: Track) -> Result<(), PlaybackError> {
        let mut state = self.shared.state.lock().await;

        if let Some(live) = state.live.take() {
            release(live).await;
        }

        state.generation += 1;
        let generation = state.generation;
        state.current_track = Some(track.clone());
        state.transport = TransportState::Loading;
        state.position_secs = 0.0;
        state.seeking = false;
        state.finished = false;
        self.shared.publish(&state);

        tracing::info!(track_id = %track.id(), title = %track.title(), "Loading track");

        let (updates, receiver, epoch) = status_channel();
        let mut resource = match self.provider.acquire(track.uri(), updates).await {
            Ok(resource) => resource,
            Err(e) => {
                tracing::error!(track_id = %track.id(), error = %e, "Error playing track");
                state.reset_to_idle();
                self.shared.publish(&state);
                return Err(PlaybackError::Acquire(e));
            }
        };

        if let Err(e) = resource.play().await {
            tracing::error!(track_id = %track.id(), error = %e, "Error starting playback");
            if let Err(e) = resource.release().await {
                tracing::warn!(error = %e, "Failed to release audio resource");
            }
            state.reset_to_idle();
            self.shared.publish(&state);
            return Err(PlaybackError::Acquire(e));
        }

        let listener = spawn_listener(self.shared.clone(), generation, receiver);
        state.live = Some(LiveResource {
            resource,
            listener,
            epoch,
        });
        state.transport = TransportState::Playing;
        state.is_minimized = true;
        state.position_secs = 0.0;
        self.shared.publish(&state);

        tracing::info!(track_id = %track.id(), "Playing");
        Ok(())
    }

    /// Pauses in place. No-op unless playing.
    pub async fn pause(&self) -> Result<(), PlaybackError> {
        let mut state = self.shared.state.lock().await;
        if state.transport != TransportState::Playing {
            tracing::debug!(transport = %state.transport, "Pause ignored");
            return Ok(());
        }

        let result = match state.live.as_mut() {
            Some(live) => live.resource.pause().await,
            None => Ok(()),
        };
        if let Err(e) = result {
            return Err(self.fail_to_idle(&mut state, e).await);
        }

        state.transport = TransportState::Paused;
        self.shared.publish(&state);
        tracing::info!("Paused");
        Ok(())
    }

    /// Resumes a paused track. No-op unless paused.
    pub async fn resume(&self) -> Result<(), PlaybackError> {
        let mut state = self.shared.state.lock().await;
        if state.transport != TransportState::Paused || state.current_track.is_none() {
            tracing::debug!(transport = %state.transport, "Resume ignored");
            return Ok(());
        }

        let restart = state.finished;
        let result = match state.live.as_mut() {
            Some(live) if restart => match live.resource.seek(0).await {
                Ok(()) => {
                    live.epoch.advance();
                    live.resource.play().await
                }
                Err(e) => Err(e),
            },
            Some(live) => live.resource.play().await,
            None => Ok(()),
        };
        if let Err(e) = result {
            return Err(self.fail_to_idle(&mut state, e).await);
        }

        if restart {
            state.position_secs = 0.0;
            state.finished = false;
        }
        state.transport = TransportState::Playing;
        self.shared.publish(&state);
        tracing::info!("Resumed");
        Ok(())
    }

    /// Releases the resource and returns to idle with no track
    pub async fn stop(&self) -> Result<(), PlaybackError> {
        let mut state = self.shared.state.lock().await;
        if state.current_track.is_none() && state.live.is_none() {
            return Ok(());
        }

        state.transport = TransportState::Stopped;
        self.shared.publish(&state);

        let mut failure = None;
        if let Some(mut live) = state.live.take() {
            if let Err(e) = live.resource.stop().await {
                tracing::warn!(error = %e, "Failed to stop audio resource");
                failure = Some(e);
            }
            release(live).await;
        }

        state.reset_to_idle();
        self.shared.publish(&state);
        tracing::info!("Stopped");

        match failure {
            Some(e) => Err(PlaybackError::Transport(e)),
            None => Ok(()),
        }
    }

    /// Raises the `seeking` guard before a scrub starts
    pub async fn begin_seek(&self) {
        let mut state = self.shared.state.lock().await;
        state.seeking = true;
        self.shared.publish(&state);
    }

    /// Lowers the `seeking` guard without moving
    pub async fn cancel_seek(&self) {
        let mut state = self.shared.state.lock().await;
        state.seeking = false;
        self.shared.publish(&state);
    }

    /// Moves to `position_secs` without changing play/pause state.
    ///
    /// The caller clamps to `0..=duration`. The `seeking` guard stays up
    /// until the resource has moved.
    pub async fn seek(&self, position_secs: f64) -> Result<(), PlaybackError> {
        let mut state = self.shared.state.lock().await;
        state.seeking = true;

        let position_ms = (position_secs * 1000.0).round() as u64;
        let result = match state.live.as_mut() {
            Some(live) => live.resource.seek(position_ms).await.map(|_| {
                live.epoch.advance();
                true
            }),
            None => Ok(false),
        };

        match result {
            Ok(moved) => {
                if moved {
                    state.position_secs = position_secs;
                    state.finished = false;
                    tracing::debug!(position_secs, "Seeked");
                }
                state.seeking = false;
                self.shared.publish(&state);
                Ok(())
            }
            Err(e) => Err(self.fail_to_idle(&mut state, e).await),
        }
    }

    /// Presentation flag only; no transport side effect
    pub async fn toggle_minimize(&self, value: bool) {
        let mut state = self.shared.state.lock().await;
        state.is_minimized = value;
        self.shared.publish(&state);
    }

    /// Single-track sessions have no queue to advance
    pub fn next(&self) {
        tracing::debug!("next() has no queue to advance");
    }

    /// Single-track sessions have no queue to rewind
    pub fn previous(&self) {
        tracing::debug!("previous() has no queue to rewind");
    }

    /// Cancels background tasks and releases the audio resource
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let ticker = match self.ticker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(ticker) = ticker {
            let _ = ticker.await;
        }

        let mut state = self.shared.state.lock().await;
        if let Some(live) = state.live.take() {
            release(live).await;
        }
        state.reset_to_idle();
        self.shared.publish(&state);
        tracing::info!("Playback session shut down");
    }

    async fn fail_to_idle(&self, state: &mut SessionState, error: AudioError) -> PlaybackError {
        tracing::error!(error = %error, "Playback command failed, returning to idle");
        if let Some(live) = state.live.take() {
            release(live).await;
        }
        state.reset_to_idle();
        self.shared.publish(state);
        PlaybackError::Transport(error)
    }
}

async fn release(mut live: LiveResource) {
    live.listener.abort();
    if let Err(e) = live.resource.release().await {
        tracing::warn!(error = %e, "Failed to release audio resource");
    }
}

fn spawn_listener(shared: Arc<Shared>, generation: u64, mut updates: StatusReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some((epoch, status)) = updates.recv().await {
            let mut state = shared.state.lock().await;
            if state.generation != generation {
                break;
            }
            let current = state.live.as_ref().map(|live| live.epoch.current());
            if current != Some(epoch) {
                tracing::trace!(epoch, "Dropping status report sent before a seek");
                continue;
            }
            shared.apply_status(&mut state, status);
        }
    })
}
