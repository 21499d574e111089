//! Client-credentials token exchange for the catalog API

use async_trait::async_trait;
use rspotify::{ClientCredsSpotify, Config, Credentials, Token};
use tokio::sync::Mutex;

use crate::catalog::CatalogError;

/// Source of bearer tokens for catalog requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, CatalogError>;
}

/// Whether an exchanged token is reused across calls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Exchange credentials on every high-level call
    #[default]
    PerCall,
    /// Keep the token until rspotify reports it expired
    CacheUntilExpiry,
}

/// Exchanges stored client credentials through rspotify's client-credentials flow
pub struct ClientCredentialsTokens {
    client_id: String,
    client_secret: String,
    policy: TokenPolicy,
    cached: Mutex<Option<Token>>,
}

impl ClientCredentialsTokens {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>, policy: TokenPolicy) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            policy,
            cached: Mutex::new(None),
        }
    }

    async fn exchange(&self) -> Result<Token, CatalogError> {
        tracing::debug!("Exchanging client credentials for access token");
        let spotify = ClientCredsSpotify::with_config(
            Credentials::new(&self.client_id, &self.client_secret),
            Config {
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );

        spotify.request_token().await.map_err(|e| {
            tracing::error!(error = %e, "Client credentials exchange failed");
            CatalogError::Token(e.to_string())
        })?;

        let token = match spotify.token.lock().await {
            Ok(guard) => guard.as_ref().cloned(),
            Err(_) => None,
        };
        token.ok_or_else(|| CatalogError::Token("no token returned".to_string()))
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsTokens {
    async fn access_token(&self) -> Result<String, CatalogError> {
        if self.policy == TokenPolicy::PerCall {
            return Ok(self.exchange().await?.access_token);
        }

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
            tracing::debug!("Cached catalog token expired");
        }

        let token = self.exchange().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}
