//! Item shapes returned by the catalog, tagged by where they were listed

use std::fmt;

use serde::Deserialize;

/// The catalog taxonomy tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Track,
    Album,
    Artist,
    Playlist,
    Show,
    Episode,
}

impl ContainerType {
    /// Order in which search results are concatenated
    pub const SEARCH_ORDER: [ContainerType; 6] = [
        ContainerType::Track,
        ContainerType::Album,
        ContainerType::Artist,
        ContainerType::Playlist,
        ContainerType::Show,
        ContainerType::Episode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContainerType::Track => "track",
            ContainerType::Album => "album",
            ContainerType::Artist => "artist",
            ContainerType::Playlist => "playlist",
            ContainerType::Show => "show",
            ContainerType::Episode => "episode",
        }
    }

    /// Whether this type lists other items rather than being playable itself
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ContainerType::Album | ContainerType::Artist | ContainerType::Playlist | ContainerType::Show
        )
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(default)]
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ShowRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct OwnerRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Track object as it appears in search, album, artist and playlist listings
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TrackItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

/// Episode object from search or a show's episode listing
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct EpisodeItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub audio_preview_url: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub show: Option<ShowRef>,
}

/// One row of a playlist's track listing
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub track: Option<TrackItem>,
}

/// Album, artist, playlist or show as a browsable summary
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ContainerSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl ContainerSummary {
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str()).filter(|u| !u.is_empty())
    }
}

/// A normalizable item, tagged with the listing it came from.
///
/// The variant decides the field mapping used by
/// [`normalize`](crate::model::normalize).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogItem {
    /// Track from search results
    Track(TrackItem),
    /// Episode from search results
    Episode(EpisodeItem),
    PlaylistEntry(PlaylistEntry),
    AlbumEntry(TrackItem),
    ArtistTopTrack(TrackItem),
    ShowEpisode(EpisodeItem),
}

impl CatalogItem {
    /// Container type of the listing this item belongs to
    pub fn container_type(&self) -> ContainerType {
        match self {
            CatalogItem::Track(_) => ContainerType::Track,
            CatalogItem::Episode(_) => ContainerType::Episode,
            CatalogItem::PlaylistEntry(_) => ContainerType::Playlist,
            CatalogItem::AlbumEntry(_) => ContainerType::Album,
            CatalogItem::ArtistTopTrack(_) => ContainerType::Artist,
            CatalogItem::ShowEpisode(_) => ContainerType::Show,
        }
    }

    /// Display title, used for rows in container listings
    pub fn title(&self) -> &str {
        let name = match self {
            CatalogItem::Track(t) | CatalogItem::AlbumEntry(t) | CatalogItem::ArtistTopTrack(t) => {
                t.name.as_deref()
            }
            CatalogItem::Episode(e) | CatalogItem::ShowEpisode(e) => e.name.as_deref(),
            CatalogItem::PlaylistEntry(entry) => entry.track.as_ref().and_then(|t| t.name.as_deref()),
        };
        name.unwrap_or("Unknown")
    }
}

/// One search result, carrying its type tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchHit {
    Track(TrackItem),
    Album(ContainerSummary),
    Artist(ContainerSummary),
    Playlist(ContainerSummary),
    Show(ContainerSummary),
    Episode(EpisodeItem),
}

/// Title, subtitle and artwork for one search row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitDisplay {
    pub title: String,
    pub subtitle: String,
    pub image_url: Option<String>,
}

impl SearchHit {
    pub fn kind(&self) -> ContainerType {
        match self {
            SearchHit::Track(_) => ContainerType::Track,
            SearchHit::Album(_) => ContainerType::Album,
            SearchHit::Artist(_) => ContainerType::Artist,
            SearchHit::Playlist(_) => ContainerType::Playlist,
            SearchHit::Show(_) => ContainerType::Show,
            SearchHit::Episode(_) => ContainerType::Episode,
        }
    }

    /// Catalog id, empty when the catalog omitted it
    pub fn id(&self) -> &str {
        let id = match self {
            SearchHit::Track(t) => t.id.as_deref(),
            SearchHit::Episode(e) => e.id.as_deref(),
            SearchHit::Album(c) | SearchHit::Artist(c) | SearchHit::Playlist(c) | SearchHit::Show(c) => {
                c.id.as_deref()
            }
        };
        id.unwrap_or_default()
    }

    /// The playable item for track and episode hits
    pub fn as_playable(&self) -> Option<CatalogItem> {
        match self {
            SearchHit::Track(t) => Some(CatalogItem::Track(t.clone())),
            SearchHit::Episode(e) => Some(CatalogItem::Episode(e.clone())),
            _ => None,
        }
    }

    pub fn display(&self) -> HitDisplay {
        match self {
            SearchHit::Track(t) => HitDisplay {
                title: t.name.clone().unwrap_or_else(|| "Unknown Track".to_string()),
                subtitle: t
                    .artists
                    .first()
                    .and_then(|a| a.name.clone())
                    .unwrap_or_else(|| "Unknown Artist".to_string()),
                image_url: t
                    .album
                    .as_ref()
                    .and_then(|a| a.images.first())
                    .map(|i| i.url.clone()),
            },
            SearchHit::Episode(e) => HitDisplay {
                title: e.name.clone().unwrap_or_else(|| "Unknown Episode".to_string()),
                subtitle: e
                    .show
                    .as_ref()
                    .and_then(|s| s.name.clone())
                    .unwrap_or_else(|| "Unknown Show".to_string()),
                image_url: e.images.first().map(|i| i.url.clone()),
            },
            SearchHit::Playlist(c) => HitDisplay {
                title: summary_title(c, self.kind()),
                subtitle: format!(
                    "Playlist • {}",
                    c.owner
                        .as_ref()
                        .and_then(|o| o.display_name.as_deref())
                        .unwrap_or("Unknown Owner")
                ),
                image_url: c.image_url().map(str::to_string),
            },
            SearchHit::Album(c) | SearchHit::Artist(c) | SearchHit::Show(c) => HitDisplay {
                title: summary_title(c, self.kind()),
                subtitle: c
                    .artists
                    .first()
                    .and_then(|a| a.name.clone())
                    .unwrap_or_else(|| self.kind().to_string()),
                image_url: c.image_url().map(str::to_string),
            },
        }
    }
}

fn summary_title(summary: &ContainerSummary, kind: ContainerType) -> String {
    summary
        .name
        .clone()
        .unwrap_or_else(|| format!("Unknown {}", kind))
}
