//! Transport commands forwarded to the playback session

use spotify_preview::model::normalize;
use spotify_preview::scan::play_scanned;

use crate::app::{Row, RowAction};
use super::AppController;

impl AppController {
    pub async fn activate_row(&self, row: Row) {
        match row.action {
            RowAction::Play { item, container_art } => {
                let result = async {
                    let track = normalize(&item, container_art.as_deref())?;
                    self.session.play(track).await?;
                    anyhow::Ok(())
                }
                .await;
                if let Err(e) = result {
                    self.report(e).await;
                }
            }
            RowAction::Open(container) => self.open_container(container).await,
            RowAction::None => {}
        }
    }

    pub async fn toggle_playback(&self) {
        if let Err(e) = self.mini_player.toggle_play().await {
            self.report(e.into()).await;
        }
    }

    pub async fn stop_playback(&self) {
        if let Err(e) = self.mini_player.stop().await {
            self.report(e.into()).await;
        }
    }

    /// Scrubs relative to the current position, clamped to the clip
    pub async fn seek_by(&self, delta_secs: f64) {
        let snapshot = self.session.snapshot();
        if snapshot.current_track.is_none() {
            return;
        }

        self.session.begin_seek().await;
        let target = (snapshot.position_secs + delta_secs).clamp(0.0, snapshot.duration_secs);
        if let Err(e) = self.session.seek(target).await {
            self.report(e.into()).await;
        }
    }

    pub async fn expand_player(&self) {
        if let Some(track) = self.mini_player.expand().await {
            tracing::debug!(track = %track, "Full player opened");
        }
    }

    pub async fn collapse_player(&self) {
        self.session.toggle_minimize(true).await;
    }

    /// The terminal has no camera; the search box text stands in for the
    /// scanned code
    pub async fn scan_to_play(&self, code: &str) {
        if code.trim().is_empty() {
            self.model.set_error("Type a code in the search box to scan it.".to_string()).await;
            return;
        }

        if let Err(e) = play_scanned(&self.catalog, &self.session, code).await {
            self.report(e.into()).await;
        }
    }
}
