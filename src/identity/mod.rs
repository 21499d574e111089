//! Identity module - accounts, profiles and avatars
//!
//! [`IdentityService`] is the seam to the backend-as-a-service; [`Account`]
//! layers form validation and the signed-in session on top of it.
//!
//! - `types`: session, user and profile records
//! - `validation`: login and registration form checks
//! - `error`: error classification and alert titles
//! - `supabase`: REST implementation of the service
//! - `account`: session-holding facade used by the app

mod account;
mod error;
mod supabase;
mod types;
mod validation;

use async_trait::async_trait;
use bytes::Bytes;

pub use account::Account;
pub use error::{IdentityError, Result};
pub use supabase::SupabaseIdentity;
pub use types::{AuthSession, AuthUser, ProfileUpdate, SignUpRequest, UserProfile};
pub use validation::{FormError, is_valid_email, validate_login, validate_registration};

#[cfg(test)]
mod tests;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<()>;

    /// Sends a recovery mail that lands back in the app after confirming
    async fn resend_verification(&self, email: &str) -> Result<()>;

    async fn get_user(&self, access_token: &str) -> Result<AuthUser>;

    async fn update_profile(&self, session: &AuthSession, update: &ProfileUpdate) -> Result<()>;

    /// Uploads (replacing) `object_path` in the avatar bucket and returns
    /// its public URL
    async fn upload_avatar(
        &self,
        session: &AuthSession,
        object_path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String>;
}
