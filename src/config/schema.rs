use std::time::Duration;

use serde::Deserialize;

use crate::auth::TokenPolicy;
use crate::session::PlaybackConfig;

/// Top-level application settings.
///
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spotify-preview/config.toml`
/// or `~/.config/spotify-preview/config.toml`.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPOTIFY_PREVIEW__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub playback: PlaybackSettings,
    pub identity: IdentitySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub market: String,
    pub search_limit: u32,
    /// Reuse the access token until it expires instead of exchanging on
    /// every call
    pub cache_token: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: "https://api.spotify.com/v1".to_string(),
            market: "US".to_string(),
            search_limit: 10,
            cache_token: false,
        }
    }
}

impl CatalogSettings {
    pub fn token_policy(&self) -> TokenPolicy {
        if self.cache_token {
            TokenPolicy::CacheUntilExpiry
        } else {
            TokenPolicy::PerCall
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Nominal preview length (seconds)
    pub preview_duration_secs: u64,
    /// Position polling period (milliseconds)
    pub poll_interval_ms: u64,
    /// Step for the seek keys (seconds)
    pub seek_step_secs: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            preview_duration_secs: 30,
            poll_interval_ms: 1000,
            seek_step_secs: 5,
        }
    }
}

impl PlaybackSettings {
    pub fn session_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            duration: Duration::from_secs(self.preview_duration_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Backend-as-a-service account settings. Sign-in is skipped when `url`
/// is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub url: String,
    pub anon_key: String,
    pub email: String,
    pub password: String,
    pub avatar_bucket: String,
    pub verification_redirect: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            email: String::new(),
            password: String::new(),
            avatar_bucket: "avatars".to_string(),
            verification_redirect: "music-streaming-app://login".to_string(),
        }
    }
}

impl IdentitySettings {
    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
