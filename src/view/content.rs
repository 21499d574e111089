//! Content pane rendering

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use spotify_preview::catalog::CatalogItem;

use crate::app::{ActiveSection, ContentState, RowAction, UiState};
use super::utils::truncate_string;

pub fn render_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playing_id: Option<&str>,
) {
    let focused = ui_state.active_section == ActiveSection::MainContent;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(content_state.title())
        .border_style(if focused { Style::default().fg(Color::Green) } else { Style::default() });

    if content_state.is_loading {
        frame.render_widget(Paragraph::new("Loading...").block(block), area);
        return;
    }

    if content_state.rows.is_empty() {
        frame.render_widget(Paragraph::new("Nothing here").style(Style::default().fg(Color::DarkGray)).block(block), area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let title_width = (content_width * 60) / 100;
    let subtitle_width = content_width.saturating_sub(title_width + 3);

    let items: Vec<ListItem> = content_state
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if !row.is_selectable() {
                return ListItem::new(row.title.clone())
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            }

            let is_playing = match (&row.action, playing_id) {
                (RowAction::Play { item, .. }, Some(id)) => item_id(item) == Some(id),
                _ => false,
            };
            let marker = match row.action {
                RowAction::Open(_) => "›",
                _ if is_playing => "▶",
                _ => " ",
            };
            let text = format!(
                "{} {}   {}",
                marker,
                truncate_string(&row.title, title_width),
                truncate_string(&row.subtitle, subtitle_width)
            );

            let style = if i == content_state.selected && focused {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_playing {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(content_state.selected));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn item_id(item: &CatalogItem) -> Option<&str> {
    match item {
        CatalogItem::Track(t) | CatalogItem::AlbumEntry(t) | CatalogItem::ArtistTopTrack(t) => t.id.as_deref(),
        CatalogItem::Episode(e) | CatalogItem::ShowEpisode(e) => e.id.as_deref(),
        CatalogItem::PlaylistEntry(entry) => entry.track.as_ref().and_then(|t| t.id.as_deref()),
    }
}
