//! Canonical track record and the mapping from catalog item shapes into it

use std::fmt;

use thiserror::Error;

use crate::catalog::{CatalogItem, EpisodeItem, PlaylistEntry, TrackItem};

/// A playable unit. Only [`normalize`] and [`Track::new`] build one, and
/// both reject an empty `id` or `uri`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    id: String,
    uri: String,
    title: String,
    artist: String,
    album_art_url: Option<String>,
}

impl Track {
    /// Builds a track from already-validated parts.
    ///
    /// Returns `None` when `id` or `uri` is empty. Used for tracks that did
    /// not come from a catalog listing.
    pub fn new(
        id: impl Into<String>,
        uri: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album_art_url: Option<String>,
    ) -> Option<Self> {
        let id = id.into();
        let uri = uri.into();
        if id.trim().is_empty() || uri.trim().is_empty() {
            return None;
        }
        Some(Self {
            id,
            uri,
            title: title.into(),
            artist: artist.into(),
            album_art_url,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Streamable preview location
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album_art_url(&self) -> Option<&str> {
        self.album_art_url.as_deref()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Why an item could not become a [`Track`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotPlayableReason {
    MissingPreview,
    MissingId,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No audio available for \"{title}\". Select another track.")]
pub struct NotPlayable {
    pub title: String,
    pub reason: NotPlayableReason,
}

/// Resolved fields before the playable check
struct Resolved<'a> {
    id: Option<&'a str>,
    uri: Option<&'a str>,
    title: Option<&'a str>,
    artist: Option<&'a str>,
    art: Option<&'a str>,
}

/// Maps one catalog item into a [`Track`].
///
/// `container_art` is the artwork of the album/playlist/show the item was
/// listed under; album entries and show episodes always use it, playlist
/// entries fall back to it when the track's album has no image.
pub fn normalize(item: &CatalogItem, container_art: Option<&str>) -> Result<Track, NotPlayable> {
    let resolved = match item {
        CatalogItem::Track(track) | CatalogItem::ArtistTopTrack(track) => Resolved {
            id: track.id.as_deref(),
            uri: track.preview_url.as_deref(),
            title: track.name.as_deref(),
            artist: first_artist(track),
            art: album_art(track),
        },
        CatalogItem::AlbumEntry(track) => Resolved {
            id: track.id.as_deref(),
            uri: track.preview_url.as_deref(),
            title: track.name.as_deref(),
            artist: first_artist(track),
            art: container_art,
        },
        CatalogItem::Episode(episode) => Resolved {
            id: episode.id.as_deref(),
            uri: episode.audio_preview_url.as_deref(),
            title: episode.name.as_deref(),
            artist: episode.show.as_ref().and_then(|s| s.name.as_deref()),
            art: episode.images.first().map(|i| i.url.as_str()),
        },
        CatalogItem::ShowEpisode(episode) => Resolved {
            id: episode.id.as_deref(),
            uri: episode.audio_preview_url.as_deref(),
            title: episode.name.as_deref(),
            artist: show_publisher(episode),
            art: container_art,
        },
        CatalogItem::PlaylistEntry(PlaylistEntry { track }) => match track {
            Some(track) => Resolved {
                id: track.id.as_deref(),
                uri: track.preview_url.as_deref(),
                title: track.name.as_deref(),
                artist: first_artist(track),
                art: album_art(track).or(container_art),
            },
            None => Resolved {
                id: None,
                uri: None,
                title: None,
                artist: None,
                art: None,
            },
        },
    };

    resolved.into_track()
}

impl Resolved<'_> {
    fn into_track(self) -> Result<Track, NotPlayable> {
        let title = self.title.unwrap_or_default().to_string();
        let uri = match non_empty(self.uri) {
            Some(uri) => uri,
            None => {
                return Err(NotPlayable {
                    title,
                    reason: NotPlayableReason::MissingPreview,
                });
            }
        };
        let id = match non_empty(self.id) {
            Some(id) => id,
            None => {
                return Err(NotPlayable {
                    title,
                    reason: NotPlayableReason::MissingId,
                });
            }
        };

        Ok(Track {
            id: id.to_string(),
            uri: uri.to_string(),
            title,
            artist: self.artist.unwrap_or_default().to_string(),
            album_art_url: non_empty(self.art).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn first_artist(track: &TrackItem) -> Option<&str> {
    track.artists.first().and_then(|a| a.name.as_deref())
}

fn album_art(track: &TrackItem) -> Option<&str> {
    track
        .album
        .as_ref()
        .and_then(|album| album.images.first())
        .map(|image| image.url.as_str())
}

fn show_publisher(episode: &EpisodeItem) -> Option<&str> {
    episode.show.as_ref().and_then(|s| s.publisher.as_deref())
}
