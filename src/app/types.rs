//! UI state types

use std::time::{Duration, Instant};

/// Which pane has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }
}

/// Modal error message with the moment it was raised
#[derive(Clone, Debug)]
pub struct Alert {
    pub message: String,
    pub raised_at: Instant,
}

impl Alert {
    pub const DISPLAY_TIME: Duration = Duration::from_secs(5);

    pub fn new(message: String) -> Self {
        Self {
            message,
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() >= Self::DISPLAY_TIME
    }
}

#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub alert: Option<Alert>,
    pub show_help_popup: bool,
    /// Display name of the signed-in account
    pub account_name: Option<String>,
    /// Address awaiting a resent confirmation mail
    pub pending_verification: Option<String>,
    pub notice: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            alert: None,
            show_help_popup: false,
            account_name: None,
            pending_verification: None,
            notice: None,
        }
    }
}
