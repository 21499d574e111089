//! Content pane data: home feed, search results and container listings

use spotify_preview::catalog::{CatalogItem, ContainerSummary, ContainerType, SearchHit};

/// What selecting a row does
#[derive(Clone, Debug)]
pub enum RowAction {
    /// Normalize and play; carries the artwork of the listing it came from
    Play {
        item: CatalogItem,
        container_art: Option<String>,
    },
    Open(ContainerRef),
    /// Section header, not selectable
    None,
}

/// A browsable container the user can open
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerRef {
    pub kind: ContainerType,
    pub id: String,
    pub title: String,
    pub art: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Row {
    pub title: String,
    pub subtitle: String,
    pub action: RowAction,
}

impl Row {
    pub fn header(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            action: RowAction::None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self.action, RowAction::None)
    }

    pub fn from_hit(hit: &SearchHit) -> Self {
        let display = hit.display();
        let action = match hit.as_playable() {
            Some(item) => RowAction::Play {
                item,
                container_art: None,
            },
            None => RowAction::Open(ContainerRef {
                kind: hit.kind(),
                id: hit.id().to_string(),
                title: display.title.clone(),
                art: display.image_url.clone(),
            }),
        };
        Self {
            title: display.title,
            subtitle: display.subtitle,
            action,
        }
    }

    pub fn from_summary(kind: ContainerType, summary: &ContainerSummary) -> Self {
        let title = summary.name.clone().unwrap_or_else(|| format!("Unknown {}", kind));
        let subtitle = summary
            .artists
            .first()
            .and_then(|a| a.name.clone())
            .or_else(|| summary.owner.as_ref().and_then(|o| o.display_name.clone()))
            .unwrap_or_else(|| kind.to_string());
        Self {
            action: RowAction::Open(ContainerRef {
                kind,
                id: summary.id.clone().unwrap_or_default(),
                title: title.clone(),
                art: summary.image_url().map(str::to_string),
            }),
            title,
            subtitle,
        }
    }

    pub fn from_item(item: CatalogItem, container_art: Option<&str>) -> Self {
        Self {
            title: item.title().to_string(),
            subtitle: item.container_type().to_string(),
            action: RowAction::Play {
                item,
                container_art: container_art.map(str::to_string),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentView {
    Home,
    SearchResults { query: String },
    Container(ContainerRef),
}

#[derive(Clone, Debug)]
pub struct ContentState {
    pub view: ContentView,
    pub rows: Vec<Row>,
    pub selected: usize,
    pub is_loading: bool,
    /// Views to return to with Backspace
    pub history: Vec<(ContentView, Vec<Row>)>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            view: ContentView::Home,
            rows: Vec::new(),
            selected: 0,
            is_loading: false,
            history: Vec::new(),
        }
    }
}

impl ContentState {
    pub fn title(&self) -> String {
        match &self.view {
            ContentView::Home => " Home ".to_string(),
            ContentView::SearchResults { query } => format!(" Search: {} ", query),
            ContentView::Container(container) => format!(" {} ({}) ", container.title, container.kind),
        }
    }

    /// Replaces the pane, remembering the current one unless it is empty
    pub fn show(&mut self, view: ContentView, rows: Vec<Row>) {
        if !self.rows.is_empty() && self.view != view {
            let previous = std::mem::replace(&mut self.view, view);
            let previous_rows = std::mem::take(&mut self.rows);
            self.history.push((previous, previous_rows));
        } else {
            self.view = view;
        }
        self.rows = rows;
        self.selected = self.first_selectable();
        self.is_loading = false;
    }

    /// Returns to the previous pane; false when there is none
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some((view, rows)) => {
                self.view = view;
                self.rows = rows;
                self.selected = self.first_selectable();
                true
            }
            None => false,
        }
    }

    pub fn move_down(&mut self) {
        let next = (self.selected + 1..self.rows.len()).find(|&i| self.rows[i].is_selectable());
        if let Some(i) = next {
            self.selected = i;
        }
    }

    pub fn move_up(&mut self) {
        let prev = (0..self.selected).rev().find(|&i| self.rows[i].is_selectable());
        if let Some(i) = prev {
            self.selected = i;
        }
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected).filter(|row| row.is_selectable())
    }

    fn first_selectable(&self) -> usize {
        (0..self.rows.len())
            .find(|&i| self.rows[i].is_selectable())
            .unwrap_or(0)
    }
}
