//! Controller module - application logic and event handling
//!
//! - `input`: key event handling
//! - `playback`: transport commands forwarded to the playback session
//! - `navigation`: home feed, search and container browsing
//! - `account`: sign-in and verification mail

mod account;
mod input;
mod navigation;
mod playback;

use std::sync::Arc;

use spotify_preview::catalog::CatalogClient;
use spotify_preview::catalog::CatalogError;
use spotify_preview::identity::{Account, IdentityError};
use spotify_preview::mini_player::MiniPlayer;
use spotify_preview::session::PlaybackSession;

use crate::app::AppModel;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) catalog: CatalogClient,
    pub(crate) session: Arc<PlaybackSession>,
    pub(crate) mini_player: MiniPlayer,
    pub(crate) account: Option<Arc<Account>>,
    seek_step_secs: f64,
}

impl AppController {
    pub fn new(
        model: Arc<AppModel>,
        catalog: CatalogClient,
        session: Arc<PlaybackSession>,
        account: Option<Arc<Account>>,
        seek_step_secs: f64,
    ) -> Self {
        Self {
            model,
            catalog,
            mini_player: MiniPlayer::new(session.clone()),
            session,
            account,
            seek_step_secs,
        }
    }

    pub(crate) async fn report(&self, error: anyhow::Error) {
        tracing::error!(error = %error, "Action failed");
        self.model.set_error(Self::format_error(&error)).await;
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(e) = error.downcast_ref::<CatalogError>() {
            return match e {
                CatalogError::Status { status: 401, .. } => {
                    "Catalog authentication failed. Check your client credentials.".to_string()
                }
                CatalogError::Status { status: 429, .. } => "Rate limited. Please wait a moment.".to_string(),
                CatalogError::Status { status: 404, endpoint } => format!("Nothing found for {}.", endpoint),
                CatalogError::Token(_) => "Could not authorize with the catalog. Please restart the app.".to_string(),
                other => format!("Error: {}", other),
            };
        }

        if let Some(e) = error.downcast_ref::<IdentityError>() {
            if e.offers_resend() {
                return format!("{}: {} Press v to resend.", e.title(), e);
            }
            return format!("{}: {}", e.title(), e);
        }

        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use spotify_preview::catalog::Endpoint;
    use spotify_preview::identity::FormError;
    use spotify_preview::model::{NotPlayable, NotPlayableReason};

    use super::*;

    #[test]
    fn catalog_errors_are_explained() {
        let err = anyhow::Error::new(CatalogError::Status {
            endpoint: Endpoint::Search,
            status: 429,
        });
        assert_eq!(AppController::format_error(&err), "Rate limited. Please wait a moment.");

        let err = anyhow::Error::new(CatalogError::Status {
            endpoint: Endpoint::Search,
            status: 500,
        });
        assert!(AppController::format_error(&err).starts_with("Error: "));
    }

    #[test]
    fn not_playable_is_shown_verbatim() {
        let err = anyhow::Error::new(NotPlayable {
            title: "Song".to_string(),
            reason: NotPlayableReason::MissingPreview,
        });
        assert_eq!(
            AppController::format_error(&err),
            "No audio available for \"Song\". Select another track."
        );
    }

    #[test]
    fn identity_errors_carry_their_title() {
        let err = anyhow::Error::new(IdentityError::Form(FormError::InvalidEmail));
        assert_eq!(
            AppController::format_error(&err),
            "Invalid email: Please enter a valid email address."
        );
    }
}
