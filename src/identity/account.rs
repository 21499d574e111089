use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use super::error::{IdentityError, Result};
use super::types::{AuthSession, ProfileUpdate, SignUpRequest, UserProfile};
use super::validation::{validate_login, validate_registration};
use super::IdentityService;

/// Folder inside the avatar bucket
const AVATAR_FOLDER: &str = "avatars";

/// Holds the signed-in session and runs the account flows against an
/// [`IdentityService`]
pub struct Account {
    service: Arc<dyn IdentityService>,
    session: Mutex<Option<AuthSession>>,
}

impl Account {
    pub fn new(service: Arc<dyn IdentityService>) -> Self {
        Self {
            service,
            session: Mutex::new(None),
        }
    }

    /// Validates the login form, then signs in.
    ///
    /// [`IdentityError::EmailNotConfirmed`] means the caller should offer
    /// [`Account::resend_verification`].
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile> {
        validate_login(email, password)?;

        let session = self.service.sign_in(email, password).await?;
        let profile = UserProfile::from(&session.user);
        tracing::info!(user_id = %profile.id, "Signed in");

        *self.session.lock().await = Some(session);
        Ok(profile)
    }

    pub async fn sign_up(&self, request: &SignUpRequest, confirm_password: &str) -> Result<()> {
        validate_registration(request, confirm_password)?;
        self.service.sign_up(request).await?;
        tracing::info!("Registration submitted; awaiting email confirmation");
        Ok(())
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.service.resend_verification(email).await
    }

    pub async fn session(&self) -> Option<AuthSession> {
        self.session.lock().await.clone()
    }

    pub async fn sign_out(&self) {
        *self.session.lock().await = None;
    }

    /// Fetches the current user's profile. `None` when signed out or when
    /// the user can no longer be fetched.
    pub async fn profile(&self) -> Option<UserProfile> {
        let session = self.session().await?;
        match self.service.get_user(&session.access_token).await {
            Ok(user) => Some(UserProfile::from(&user)),
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching user session");
                None
            }
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let session = self.session().await.ok_or(IdentityError::NotSignedIn)?;
        self.service.update_profile(&session, update).await
    }

    /// Uploads the image at `path` as the user's avatar and records its
    /// public URL on the profile
    pub async fn change_avatar(&self, path: &Path) -> Result<String> {
        let session = self.session().await.ok_or(IdentityError::NotSignedIn)?;
        let data = Bytes::from(tokio::fs::read(path).await?);
        self.upload_avatar(&session, path, data).await
    }

    async fn upload_avatar(&self, session: &AuthSession, path: &Path, data: Bytes) -> Result<String> {
        let ext = avatar_extension(path);
        let object_path = format!("{}/{}.{}", AVATAR_FOLDER, session.user.id, ext);

        let public_url = self
            .service
            .upload_avatar(session, &object_path, content_type(&ext), data)
            .await?;

        let update = ProfileUpdate {
            avatar_url: Some(public_url.clone()),
            ..ProfileUpdate::default()
        };
        self.service.update_profile(session, &update).await?;

        tracing::info!(user_id = %session.user.id, url = %public_url, "Avatar updated");
        Ok(public_url)
    }
}

fn avatar_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}

fn content_type(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "image/jpeg",
    }
}
