//! Supabase REST implementation of [`IdentityService`]

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::{IdentityError, Result};
use super::types::{AuthSession, AuthUser, ProfileUpdate, SignUpRequest};
use super::IdentityService;
use crate::config::IdentitySettings;

#[derive(Clone)]
pub struct SupabaseIdentity {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    avatar_bucket: String,
    verification_redirect: String,
}

impl SupabaseIdentity {
    pub fn new(settings: &IdentitySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            avatar_bucket: settings.avatar_bucket.clone(),
            verification_redirect: settings.verification_redirect.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn public_avatar_url(&self, object_path: &str) -> String {
        self.url(&format!("/storage/v1/object/public/{}/{}", self.avatar_bucket, object_path))
    }

    async fn send(&self, operation: &'static str, request: reqwest::RequestBuilder) -> Result<Bytes> {
        crate::log_api_request!(operation, service = "identity");

        let result = async {
            let response = request
                .header("apikey", &self.anon_key)
                .send()
                .await
                .map_err(|source| IdentityError::Transport { operation, source })?;

            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|source| IdentityError::Transport { operation, source })?;

            if !status.is_success() {
                return Err(IdentityError::classify(operation, status.as_u16(), error_message(&body)));
            }
            Ok(body)
        }
        .await;

        crate::log_api_result!(operation, result);
        result
    }

    async fn send_json<T: DeserializeOwned>(&self, operation: &'static str, request: reqwest::RequestBuilder) -> Result<T> {
        let body = self.send(operation, request).await?;
        serde_json::from_slice(&body).map_err(|source| IdentityError::Decode { operation, source })
    }
}

/// Pulls the human-readable message out of an auth/storage/rest error body
pub(super) fn error_message(body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

#[async_trait]
impl IdentityService for SupabaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = self
            .http
            .post(self.url("/auth/v1/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        self.send_json("sign_in", request).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<()> {
        let body = json!({
            "email": request.email,
            "password": request.password,
            "phone": request.phone,
            "data": { "display_name": request.username },
        });
        let request = self.http.post(self.url("/auth/v1/signup")).json(&body);
        self.send("sign_up", request).await.map(|_| ())
    }

    async fn resend_verification(&self, email: &str) -> Result<()> {
        let request = self
            .http
            .post(self.url("/auth/v1/recover"))
            .query(&[("redirect_to", self.verification_redirect.as_str())])
            .json(&json!({ "email": email }));
        self.send("resend_verification", request).await.map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let request = self.http.get(self.url("/auth/v1/user")).bearer_auth(access_token);
        self.send_json("get_user", request).await
    }

    async fn update_profile(&self, session: &AuthSession, update: &ProfileUpdate) -> Result<()> {
        let filter = format!("eq.{}", session.user.id);
        let request = self
            .http
            .patch(self.url("/rest/v1/profiles"))
            .query(&[("id", filter.as_str())])
            .bearer_auth(&session.access_token)
            .header("Prefer", "return=minimal")
            .json(update);
        self.send("update_profile", request).await.map(|_| ())
    }

    async fn upload_avatar(
        &self,
        session: &AuthSession,
        object_path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<String> {
        let request = self
            .http
            .post(self.url(&format!("/storage/v1/object/{}/{}", self.avatar_bucket, object_path)))
            .bearer_auth(&session.access_token)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);
        self.send("upload_avatar", request).await?;
        Ok(self.public_avatar_url(object_path))
    }
}
