//! Playback session state as seen by observers

use std::fmt;

use super::track::Track;

/// Transport state of the playback session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    /// Resource is being released after `stop`; settles to `Idle`
    Stopped,
}

impl TransportState {
    pub fn is_playing(self) -> bool {
        self == TransportState::Playing
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportState::Idle => "idle",
            TransportState::Loading => "loading",
            TransportState::Playing => "playing",
            TransportState::Paused => "paused",
            TransportState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Published copy of the session fields. Screens render from this and
/// never mutate the session directly.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub current_track: Option<Track>,
    pub transport: TransportState,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub is_minimized: bool,
    pub seeking: bool,
}

impl SessionSnapshot {
    pub fn idle(duration_secs: f64) -> Self {
        Self {
            current_track: None,
            transport: TransportState::Idle,
            position_secs: 0.0,
            duration_secs,
            is_minimized: false,
            seeking: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Playback progress in `0.0..=1.0`
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}
