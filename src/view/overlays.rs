//! Overlay rendering (error notification, help popup)

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::UiState;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(message) = ui_state.alert.as_ref().map(|alert| alert.message.as_str()) else {
        return;
    };

    let area = frame.area();
    let width = 56.min(area.width.saturating_sub(4));
    let text_width = width.saturating_sub(4).max(1) as usize;
    let wrapped_lines = message.chars().count().div_ceil(text_width).max(1) as u16;
    let height = (wrapped_lines + 2).min(area.height.saturating_sub(4));

    let popup_area = centered(area, width, height);
    frame.render_widget(Clear, popup_area);

    let alert = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Alert (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(alert, popup_area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

enum HelpEntry {
    Section(&'static str),
    Binding(&'static str, &'static str),
    Gap,
}

use HelpEntry::{Binding, Gap, Section};

const HELP: &[HelpEntry] = &[
    Section("Browse"),
    Binding("Tab", "Switch search / content"),
    Binding("↑ / ↓", "Move selection"),
    Binding("Enter", "Search / Play / Open"),
    Binding("Backspace / Esc", "Go back"),
    Binding("G or /", "Focus search"),
    Binding("R", "Reload home feed"),
    Gap,
    Section("Playback"),
    Binding("Space", "Play / Pause"),
    Binding("S", "Stop"),
    Binding("E", "Expand mini-player"),
    Binding("Esc / M", "Minimize full player"),
    Binding("← / →", "Seek (full player)"),
    Binding("Ctrl+P", "Scan code from search box"),
    Gap,
    Section("General"),
    Binding("V", "Resend verification email"),
    Binding("H", "Toggle this help"),
    Binding("Q / Ctrl+Q", "Quit"),
];

impl HelpEntry {
    fn to_line(&self) -> Line<'static> {
        match self {
            Section(name) => Line::from(Span::styled(
                format!("{:^38}", format!("── {} ──", name)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Binding(key, action) => Line::from(vec![
                Span::styled(
                    format!("{:>18}", key),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(*action, Style::default().fg(Color::White)),
            ]),
            Gap => Line::default(),
        }
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();
    let height = (HELP.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered(area, 62.min(area.width), height);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = HELP.iter().map(HelpEntry::to_line).collect();
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help (H or Esc to close) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(help, popup_area);
}
