//! Key event handling
//!
//! Keys are offered to one context at a time, narrowest first: modal
//! overlays, Ctrl chords, the full player, the focused section, then the
//! global bindings. A handler returns `true` once it has consumed the key.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::ActiveSection;
use super::AppController;

fn is_key(code: KeyCode, c: char) -> bool {
    match code {
        KeyCode::Char(k) => k.eq_ignore_ascii_case(&c),
        _ => false,
    }
}

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.handle_overlay_key(key.code).await {
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_ctrl_chord(key.code).await;
            return Ok(());
        }

        let snapshot = self.session.snapshot();
        if snapshot.current_track.is_some() && !snapshot.is_minimized {
            // Full player is modal for transport keys
            self.handle_player_key(key.code).await;
            return Ok(());
        }

        let consumed = match self.model.get_ui_state().await.active_section {
            ActiveSection::Search => self.handle_search_key(key.code).await,
            ActiveSection::MainContent => self.handle_content_key(key.code).await,
        };
        if !consumed {
            self.handle_global_key(key.code).await;
        }
        Ok(())
    }

    /// Alerts and the help popup swallow every key except their own dismissals
    async fn handle_overlay_key(&self, code: KeyCode) -> bool {
        if self.model.has_error().await {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return true;
        }

        if self.model.is_help_popup_open().await {
            if code == KeyCode::Esc || is_key(code, 'h') {
                self.model.toggle_help_popup().await;
            }
            return true;
        }

        false
    }

    async fn handle_ctrl_chord(&self, code: KeyCode) {
        if is_key(code, 'q') {
            self.model.set_should_quit(true).await;
        } else if is_key(code, 'p') {
            let code = self.model.get_ui_state().await.search_query;
            self.scan_to_play(&code).await;
        }
    }

    async fn handle_player_key(&self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.collapse_player().await,
            KeyCode::Left => self.seek_by(-self.seek_step_secs).await,
            KeyCode::Right => self.seek_by(self.seek_step_secs).await,
            KeyCode::Char(' ') => self.toggle_playback().await,
            c if is_key(c, 'm') => self.collapse_player().await,
            c if is_key(c, 's') => self.stop_playback().await,
            c if is_key(c, 'n') => self.session.next(),
            c if is_key(c, 'p') => self.session.previous(),
            _ => {}
        }
    }

    async fn handle_search_key(&self, code: KeyCode) -> bool {
        match code {
            KeyCode::Enter => {
                let query = self.model.get_ui_state().await.search_query;
                self.perform_search(&query).await;
            }
            KeyCode::Esc => self.model.clear_search().await,
            KeyCode::Backspace => self.model.backspace_search().await,
            KeyCode::Char(c) => self.model.append_to_search(c).await,
            _ => return false,
        }
        true
    }

    async fn handle_content_key(&self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up => self.model.content_move_up().await,
            KeyCode::Down => self.model.content_move_down().await,
            KeyCode::Backspace | KeyCode::Esc => {
                self.model.content_back().await;
            }
            KeyCode::Enter => {
                if let Some(row) = self.model.get_selected_row().await {
                    self.activate_row(row).await;
                }
            }
            _ => return false,
        }
        true
    }

    async fn handle_global_key(&self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::BackTab => self.model.cycle_section().await,
            KeyCode::Char('/') => self.model.set_active_section(ActiveSection::Search).await,
            KeyCode::Char(' ') => self.toggle_playback().await,
            c if is_key(c, 'q') => self.model.set_should_quit(true).await,
            c if is_key(c, 'g') => self.model.set_active_section(ActiveSection::Search).await,
            c if is_key(c, 's') => self.stop_playback().await,
            c if is_key(c, 'e') => self.expand_player().await,
            c if is_key(c, 'r') => self.load_home().await,
            c if is_key(c, 'h') => self.model.toggle_help_popup().await,
            c if is_key(c, 'v') => self.resend_verification().await,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_keys_ignore_case() {
        assert!(is_key(KeyCode::Char('Q'), 'q'));
        assert!(is_key(KeyCode::Char('q'), 'q'));
        assert!(!is_key(KeyCode::Char('w'), 'q'));
        assert!(!is_key(KeyCode::Enter, 'q'));
    }
}
