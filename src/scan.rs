//! Scan-to-play: a scanned code is looked up as a search query and the
//! first track hit starts playing

use thiserror::Error;

use crate::catalog::{CatalogClient, CatalogError};
use crate::model::{NotPlayable, Track, normalize};
use crate::session::{PlaybackError, PlaybackSession};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No track found for \"{0}\"")]
    NoMatch(String),

    #[error(transparent)]
    NotPlayable(#[from] NotPlayable),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

pub async fn play_scanned(catalog: &CatalogClient, session: &PlaybackSession, code: &str) -> Result<Track, ScanError> {
    let code = code.trim();
    tracing::info!(code, "Scanned code");

    let item = catalog
        .first_track(code)
        .await?
        .ok_or_else(|| ScanError::NoMatch(code.to_string()))?;
    let track = normalize(&item, None)?;

    session.play(track.clone()).await?;
    Ok(track)
}
