//! View module - UI rendering
//!
//! - `utils`: shared formatting helpers
//! - `layout`: top bar
//! - `content`: content pane list
//! - `player`: mini-player bar and full player
//! - `overlays`: error alert and help popup

mod content;
mod layout;
mod overlays;
mod player;
mod utils;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use spotify_preview::mini_player;
use spotify_preview::model::{SessionSnapshot, Track};

use crate::app::{ContentState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &SessionSnapshot, ui_state: &UiState, content_state: &ContentState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + account
                Constraint::Min(0),    // Content pane
                Constraint::Length(3), // Mini-player bar or key hints
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);

        let playing_id = snapshot.current_track.as_ref().map(Track::id);
        content::render_content(frame, chunks[1], ui_state, content_state, playing_id);

        match mini_player::view(snapshot) {
            Some(bar) => player::render_mini_player(frame, chunks[2], &bar),
            None => layout::render_status_line(frame, chunks[2], ui_state),
        }

        // Full player covers the content pane while expanded
        if let Some(track) = snapshot.current_track.as_ref().filter(|_| !snapshot.is_minimized) {
            player::render_full_player(frame, chunks[1], track, snapshot);
        }

        if ui_state.alert.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
