//! Application model - UI state shared between the controller and the view
//!
//! Playback state is not kept here; the view reads it from the session's
//! snapshot every frame.
//!
//! - `types`: focus and UI flags
//! - `content`: content pane rows and navigation history

mod content;
mod types;

use std::sync::Arc;
use tokio::sync::Mutex;

pub use content::{ContainerRef, ContentState, ContentView, Row, RowAction};
pub use types::{ActiveSection, Alert, UiState};

pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn cycle_section(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    pub async fn clear_search(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    pub async fn set_content_loading(&self, loading: bool) {
        self.content_state.lock().await.is_loading = loading;
    }

    pub async fn show_content(&self, view: ContentView, rows: Vec<Row>) {
        self.content_state.lock().await.show(view, rows);
    }

    pub async fn content_back(&self) -> bool {
        self.content_state.lock().await.back()
    }

    pub async fn content_move_up(&self) {
        self.content_state.lock().await.move_up();
    }

    pub async fn content_move_down(&self) {
        self.content_state.lock().await.move_down();
    }

    pub async fn get_selected_row(&self) -> Option<Row> {
        self.content_state.lock().await.selected_row().cloned()
    }

    /// Raises an alert, replacing any alert already shown
    pub async fn set_error(&self, message: String) {
        self.ui_state.lock().await.alert = Some(Alert::new(message));
    }

    pub async fn clear_error(&self) {
        self.ui_state.lock().await.alert = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.alert.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if state.alert.as_ref().is_some_and(Alert::is_expired) {
            state.alert = None;
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn set_account_name(&self, name: Option<String>) {
        self.ui_state.lock().await.account_name = name;
    }

    pub async fn set_notice(&self, notice: Option<String>) {
        self.ui_state.lock().await.notice = notice;
    }

    pub async fn set_pending_verification(&self, email: Option<String>) {
        self.ui_state.lock().await.pending_verification = email;
    }
}
