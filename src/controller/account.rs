//! Account sign-in and verification mail

use super::AppController;

impl AppController {
    /// Signs in with stored credentials and shows the account name
    pub async fn sign_in(&self, email: &str, password: &str) {
        let Some(account) = &self.account else {
            return;
        };

        match account.sign_in(email, password).await {
            Ok(profile) => {
                self.model.set_account_name(Some(profile.display_name)).await;
            }
            Err(e) => {
                if e.offers_resend() {
                    self.model.set_pending_verification(Some(email.to_string())).await;
                }
                self.report(e.into()).await;
            }
        }
    }

    /// Re-sends the confirmation mail after an "Email not confirmed" sign-in
    pub async fn resend_verification(&self) {
        let Some(account) = &self.account else {
            return;
        };
        let Some(email) = self.model.get_ui_state().await.pending_verification else {
            return;
        };

        match account.resend_verification(&email).await {
            Ok(()) => {
                self.model.set_pending_verification(None).await;
                self.model
                    .set_notice(Some("Verification email resent successfully".to_string()))
                    .await;
            }
            Err(e) => self.report(e.into()).await,
        }
    }
}
