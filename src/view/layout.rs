//! Top bar and status line

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{ActiveSection, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(28), // Account
        ])
        .split(area);

    let focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(if focused { Style::default().fg(Color::Green) } else { Style::default() }),
    );
    frame.render_widget(search, chunks[0]);

    let account_text = match &ui_state.account_name {
        Some(name) => format!("👤 {}", name),
        None => "Not signed in".to_string(),
    };
    let account = Paragraph::new(account_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Account "));
    frame.render_widget(account, chunks[1]);
}

/// Shown in place of the mini-player bar when nothing is loaded
pub fn render_status_line(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let text = ui_state
        .notice
        .clone()
        .unwrap_or_else(|| " Enter: play / open   Ctrl+P: scan code   H: help   Q: quit".to_string());

    let status = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}
