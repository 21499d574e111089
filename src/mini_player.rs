//! Mini-player adapter
//!
//! Decides whether the collapsed player bar is shown and forwards its
//! transport buttons to the session. It holds no state of its own.

use std::sync::Arc;

use crate::model::{SessionSnapshot, Track, TransportState};
use crate::session::{PlaybackError, PlaybackSession};

/// What the collapsed bar renders
#[derive(Clone, Debug, PartialEq)]
pub struct MiniPlayerView {
    pub track: Track,
    pub is_playing: bool,
    pub progress: f64,
}

/// Returns the bar contents, or `None` when the bar is hidden.
///
/// Shown only when a track is loaded and the session is minimized.
pub fn view(snapshot: &SessionSnapshot) -> Option<MiniPlayerView> {
    match &snapshot.current_track {
        Some(track) if snapshot.is_minimized => Some(MiniPlayerView {
            track: track.clone(),
            is_playing: snapshot.is_playing(),
            progress: snapshot.progress_ratio(),
        }),
        _ => None,
    }
}

pub fn is_visible(snapshot: &SessionSnapshot) -> bool {
    view(snapshot).is_some()
}

#[derive(Clone)]
pub struct MiniPlayer {
    session: Arc<PlaybackSession>,
}

impl MiniPlayer {
    pub fn new(session: Arc<PlaybackSession>) -> Self {
        Self { session }
    }

    pub fn view(&self) -> Option<MiniPlayerView> {
        view(&self.session.snapshot())
    }

    /// Leaves the collapsed bar for the full player.
    ///
    /// Returns the track the full player should show, if any.
    pub async fn expand(&self) -> Option<Track> {
        let track = self.session.snapshot().current_track?;
        self.session.toggle_minimize(false).await;
        tracing::debug!(track_id = %track.id(), "Mini-player expanded");
        Some(track)
    }

    /// Play/pause button
    pub async fn toggle_play(&self) -> Result<(), PlaybackError> {
        let snapshot = self.session.snapshot();
        match snapshot.transport {
            TransportState::Playing => self.session.pause().await,
            TransportState::Paused => self.session.resume().await,
            // Idle and Stopped never hold a track, so there is nothing to restart
            TransportState::Loading | TransportState::Idle | TransportState::Stopped => Ok(()),
        }
    }

    pub async fn stop(&self) -> Result<(), PlaybackError> {
        self.session.stop().await
    }
}
