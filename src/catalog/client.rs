//! Catalog query facade: one method per container request

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::TokenSource;

use super::endpoint::Endpoint;
use super::error::{CatalogError, Result};
use super::transport::{CatalogTransport, Query};
use super::types::{
    CatalogItem, ContainerSummary, ContainerType, EpisodeItem, PlaylistEntry, SearchHit, TrackItem,
};

#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Page<T> {
    /// Items in catalog order, skipping null entries
    fn into_items(self) -> impl Iterator<Item = T> {
        self.items.into_iter().flatten()
    }
}

#[derive(Deserialize)]
struct FeaturedPlaylistsResponse {
    #[serde(default)]
    playlists: Page<ContainerSummary>,
}

#[derive(Deserialize)]
struct NewReleasesResponse {
    #[serde(default)]
    albums: Page<ContainerSummary>,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<Option<TrackItem>>,
}

#[derive(Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    tracks: Page<TrackItem>,
    #[serde(default)]
    albums: Page<ContainerSummary>,
    #[serde(default)]
    artists: Page<ContainerSummary>,
    #[serde(default)]
    playlists: Page<ContainerSummary>,
    #[serde(default)]
    shows: Page<ContainerSummary>,
    #[serde(default)]
    episodes: Page<EpisodeItem>,
}

/// Home screen sections. Each section succeeds or fails on its own.
#[derive(Debug)]
pub struct HomeFeed {
    pub featured_playlists: Result<Vec<ContainerSummary>>,
    pub new_releases: Result<Vec<ContainerSummary>>,
}

/// Catalog API client. Holds no response cache; every call goes to the network.
#[derive(Clone)]
pub struct CatalogClient {
    transport: Arc<dyn CatalogTransport>,
    tokens: Arc<dyn TokenSource>,
    market: String,
    search_limit: u32,
}

impl CatalogClient {
    pub fn new(
        transport: Arc<dyn CatalogTransport>,
        tokens: Arc<dyn TokenSource>,
        market: impl Into<String>,
        search_limit: u32,
    ) -> Self {
        Self {
            transport,
            tokens,
            market: market.into(),
            search_limit,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint, query: Query) -> Result<T> {
        let token = self.tokens.access_token().await?;
        let result = self.transport.get(&endpoint, query, &token).await;
        crate::log_api_result!(endpoint.to_string(), result);
        decode(&endpoint, result?)
    }

    fn market_query(&self) -> Query {
        vec![("market".to_string(), self.market.clone())]
    }

    pub async fn featured_playlists(&self) -> Result<Vec<ContainerSummary>> {
        let response: FeaturedPlaylistsResponse = self.fetch(Endpoint::FeaturedPlaylists, Vec::new()).await?;
        Ok(response.playlists.into_items().collect())
    }

    pub async fn new_releases(&self) -> Result<Vec<ContainerSummary>> {
        let response: NewReleasesResponse = self.fetch(Endpoint::NewReleases, Vec::new()).await?;
        Ok(response.albums.into_items().collect())
    }

    /// Featured playlists and new releases, fetched concurrently
    pub async fn home_feed(&self) -> HomeFeed {
        let (featured_playlists, new_releases) =
            futures::join!(self.featured_playlists(), self.new_releases());

        if let Err(e) = &featured_playlists {
            tracing::warn!(error = %e, "Featured playlists unavailable");
        }
        if let Err(e) = &new_releases {
            tracing::warn!(error = %e, "New releases unavailable");
        }

        HomeFeed {
            featured_playlists,
            new_releases,
        }
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CatalogItem>> {
        let page: Page<PlaylistEntry> = self
            .fetch(Endpoint::PlaylistTracks(playlist_id.to_string()), Vec::new())
            .await?;
        Ok(page.into_items().map(CatalogItem::PlaylistEntry).collect())
    }

    pub async fn album_tracks(&self, album_id: &str) -> Result<Vec<CatalogItem>> {
        let page: Page<TrackItem> = self
            .fetch(Endpoint::AlbumTracks(album_id.to_string()), Vec::new())
            .await?;
        Ok(page.into_items().map(CatalogItem::AlbumEntry).collect())
    }

    pub async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<CatalogItem>> {
        let response: TopTracksResponse = self
            .fetch(Endpoint::ArtistTopTracks(artist_id.to_string()), self.market_query())
            .await?;
        Ok(response
            .tracks
            .into_iter()
            .flatten()
            .map(CatalogItem::ArtistTopTrack)
            .collect())
    }

    pub async fn show_episodes(&self, show_id: &str) -> Result<Vec<CatalogItem>> {
        let page: Page<EpisodeItem> = self
            .fetch(Endpoint::ShowEpisodes(show_id.to_string()), self.market_query())
            .await?;
        Ok(page.into_items().map(CatalogItem::ShowEpisode).collect())
    }

    /// Items listed under a browsable container
    pub async fn container_items(&self, kind: ContainerType, id: &str) -> Result<Vec<CatalogItem>> {
        match kind {
            ContainerType::Playlist => self.playlist_tracks(id).await,
            ContainerType::Album => self.album_tracks(id).await,
            ContainerType::Artist => self.artist_top_tracks(id).await,
            ContainerType::Show => self.show_episodes(id).await,
            ContainerType::Track | ContainerType::Episode => Err(CatalogError::NotAContainer(kind)),
        }
    }

    /// Searches every type at once.
    ///
    /// Hits keep relevance order within a type; types are concatenated as
    /// track, album, artist, playlist, show, episode.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let types = ContainerType::SEARCH_ORDER
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("type".to_string(), types),
            ("limit".to_string(), self.search_limit.to_string()),
            ("market".to_string(), self.market.clone()),
        ];

        let response: SearchResponse = self.fetch(Endpoint::Search, params).await?;

        let hits: Vec<SearchHit> = response
            .tracks
            .into_items()
            .map(SearchHit::Track)
            .chain(response.albums.into_items().map(SearchHit::Album))
            .chain(response.artists.into_items().map(SearchHit::Artist))
            .chain(response.playlists.into_items().map(SearchHit::Playlist))
            .chain(response.shows.into_items().map(SearchHit::Show))
            .chain(response.episodes.into_items().map(SearchHit::Episode))
            .collect();

        tracing::debug!(query, count = hits.len(), "Search completed");
        Ok(hits)
    }

    /// First track hit for a query, used for scanned codes
    pub async fn first_track(&self, query: &str) -> Result<Option<CatalogItem>> {
        let hits = self.search(query).await?;
        Ok(hits.iter().find(|h| h.kind() == ContainerType::Track).and_then(SearchHit::as_playable))
    }
}

fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.clone(),
        source,
    })
}
