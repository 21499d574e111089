//! Catalog REST endpoints and their request paths

use std::fmt;

/// One catalog endpoint, with the identifiers it needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    FeaturedPlaylists,
    NewReleases,
    PlaylistTracks(String),
    AlbumTracks(String),
    ArtistTopTracks(String),
    ShowEpisodes(String),
    Search,
}

impl Endpoint {
    /// Path relative to the API base url
    pub fn path(&self) -> String {
        match self {
            Endpoint::FeaturedPlaylists => "browse/featured-playlists".to_string(),
            Endpoint::NewReleases => "browse/new-releases".to_string(),
            Endpoint::PlaylistTracks(id) => format!("playlists/{}/tracks", id),
            Endpoint::AlbumTracks(id) => format!("albums/{}/tracks", id),
            Endpoint::ArtistTopTracks(id) => format!("artists/{}/top-tracks", id),
            Endpoint::ShowEpisodes(id) => format!("shows/{}/episodes", id),
            Endpoint::Search => "search".to_string(),
        }
    }

    /// Full request url under `base`
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::FeaturedPlaylists => f.write_str("featured playlists"),
            Endpoint::NewReleases => f.write_str("new releases"),
            Endpoint::PlaylistTracks(id) => write!(f, "playlist tracks ({})", id),
            Endpoint::AlbumTracks(id) => write!(f, "album tracks ({})", id),
            Endpoint::ArtistTopTracks(id) => write!(f, "artist top tracks ({})", id),
            Endpoint::ShowEpisodes(id) => write!(f, "show episodes ({})", id),
            Endpoint::Search => f.write_str("search"),
        }
    }
}
