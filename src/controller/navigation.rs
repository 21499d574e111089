//! Home feed, search and container browsing

use spotify_preview::catalog::{CatalogError, ContainerType};

use crate::app::{ActiveSection, ContainerRef, ContentView, Row};
use super::AppController;

impl AppController {
    /// Loads featured playlists and new releases; a failed section shows
    /// its error in place of its rows
    pub async fn load_home(&self) {
        self.model.set_content_loading(true).await;
        let feed = self.catalog.home_feed().await;

        let mut rows = Vec::new();
        push_section(&mut rows, "Featured Playlists", ContainerType::Playlist, feed.featured_playlists);
        push_section(&mut rows, "New Releases", ContainerType::Album, feed.new_releases);

        self.model.show_content(ContentView::Home, rows).await;
    }

    pub async fn perform_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.model.set_content_loading(true).await;
        match self.catalog.search(query).await {
            Ok(hits) => {
                let rows = hits.iter().map(Row::from_hit).collect();
                self.model
                    .show_content(ContentView::SearchResults { query: query.to_string() }, rows)
                    .await;
                self.model.set_active_section(ActiveSection::MainContent).await;
            }
            Err(e) => {
                self.model.set_content_loading(false).await;
                self.report(e.into()).await;
            }
        }
    }

    pub async fn open_container(&self, container: ContainerRef) {
        self.model.set_content_loading(true).await;
        match self.catalog.container_items(container.kind, &container.id).await {
            Ok(items) => {
                let art = container.art.clone();
                let rows = items
                    .into_iter()
                    .map(|item| Row::from_item(item, art.as_deref()))
                    .collect();
                self.model.show_content(ContentView::Container(container), rows).await;
            }
            Err(e) => {
                self.model.set_content_loading(false).await;
                self.report(e.into()).await;
            }
        }
    }
}

fn push_section(
    rows: &mut Vec<Row>,
    title: &str,
    kind: ContainerType,
    section: Result<Vec<spotify_preview::catalog::ContainerSummary>, CatalogError>,
) {
    match section {
        Ok(items) => {
            rows.push(Row::header(title));
            rows.extend(items.iter().map(|summary| Row::from_summary(kind, summary)));
        }
        Err(e) => {
            tracing::warn!(section = title, error = %e, "Home section unavailable");
            rows.push(Row::header(format!("{} (unavailable: {})", title, e)));
        }
    }
}
