//! Mini-player bar and full player

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};
use spotify_preview::mini_player::MiniPlayerView;
use spotify_preview::model::{SessionSnapshot, Track, TransportState};

use super::utils::format_secs;

pub fn render_mini_player(frame: &mut Frame, area: Rect, bar: &MiniPlayerView) {
    let icon = if bar.is_playing { "▶" } else { "⏸" };
    let title = format!(" {} {} | {} ", icon, bar.track.title(), bar.track.artist());

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(" Space: play/pause  E: expand  S: stop ").right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(bar.progress)
        .label("");

    frame.render_widget(gauge, area);
}

pub fn render_full_player(frame: &mut Frame, area: Rect, track: &Track, snapshot: &SessionSnapshot) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Now Playing (Esc/M to minimize) ")
        .title_bottom(Line::from(" ←/→: seek  Space: play/pause  S: stop ").right_aligned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Track info
            Constraint::Length(3), // Progress
        ])
        .split(inner);

    let state = match snapshot.transport {
        TransportState::Loading => "Loading...",
        TransportState::Playing => "▶ Playing",
        TransportState::Paused => "⏸ Paused",
        TransportState::Idle | TransportState::Stopped => "■ Stopped",
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(track.title().to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(track.artist().to_string()).style(Style::default().fg(Color::Gray)),
        Line::from(""),
        Line::from(state).style(Style::default().fg(Color::Green)),
    ];
    if let Some(art) = track.album_art_url() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Artwork: {}", art)).style(Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[0]);

    let label = format!(
        "{} / {}",
        format_secs(snapshot.position_secs),
        format_secs(snapshot.duration_secs)
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::TOP))
        .gauge_style(Style::default().fg(if snapshot.seeking { Color::Yellow } else { Color::Green }))
        .ratio(snapshot.progress_ratio())
        .label(label);
    frame.render_widget(gauge, chunks[1]);
}
