//! Catalog module - music catalog API access
//!
//! - `types`: item shapes and the container/search tags
//! - `endpoint`: REST endpoints and paths
//! - `transport`: authenticated HTTP GET seam
//! - `client`: the query facade used by screens
//! - `error`: typed fetch errors

mod client;
mod endpoint;
mod error;
mod transport;
mod types;

pub use client::{CatalogClient, HomeFeed};
pub use endpoint::Endpoint;
pub use error::{CatalogError, Result};
pub use transport::{CatalogTransport, HttpTransport, Query};
pub use types::{
    AlbumRef, ArtistRef, CatalogItem, ContainerSummary, ContainerType, EpisodeItem, HitDisplay,
    Image, OwnerRef, PlaylistEntry, SearchHit, ShowRef, TrackItem,
};

#[cfg(test)]
pub(crate) use transport::MockCatalogTransport;
