use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::auth::TokenPolicy;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

fn valid_settings() -> Settings {
    let mut settings = Settings::default();
    settings.catalog.client_id = "id".to_string();
    settings.catalog.client_secret = "secret".to_string();
    settings
}

#[test]
fn resolve_config_path_prefers_explicit_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SPOTIFY_PREVIEW_CONFIG_PATH", "/tmp/spotify-preview-test.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/spotify-preview-test.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("spotify-preview")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("spotify-preview")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_preview_clip_behavior() {
    let settings = Settings::default();
    assert_eq!(settings.playback.preview_duration_secs, 30);
    assert_eq!(settings.playback.poll_interval_ms, 1000);
    assert_eq!(settings.identity.avatar_bucket, "avatars");
    assert_eq!(settings.identity.verification_redirect, "music-streaming-app://login");
    assert!(!settings.catalog.cache_token);
    assert_eq!(settings.catalog.token_policy(), TokenPolicy::PerCall);
    assert!(!settings.identity.is_enabled());

    let session = settings.playback.session_config();
    assert_eq!(session.duration, Duration::from_secs(30));
    assert_eq!(session.poll_interval, Duration::from_secs(1));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
client_id = "file-id"
client_secret = "file-secret"
market = "BG"
cache_token = true

[playback]
poll_interval_ms = 250
seek_step_secs = 10

[identity]
url = "https://project.supabase.co"
anon_key = "anon"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SPOTIFY_PREVIEW_CONFIG_PATH", cfg_path.to_str().unwrap());
    let settings = Settings::load().unwrap();

    assert_eq!(settings.catalog.client_id, "file-id");
    assert_eq!(settings.catalog.market, "BG");
    assert_eq!(settings.catalog.token_policy(), TokenPolicy::CacheUntilExpiry);
    assert_eq!(settings.catalog.api_base_url, "https://api.spotify.com/v1");
    assert_eq!(settings.playback.poll_interval_ms, 250);
    assert_eq!(settings.playback.seek_step_secs, 10);
    assert_eq!(settings.playback.preview_duration_secs, 30);
    assert!(settings.identity.is_enabled());
    assert_eq!(settings.identity.avatar_bucket, "avatars");
    settings.validate().unwrap();
}

#[test]
fn environment_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[catalog]\nmarket = \"BG\"\n").unwrap();

    let _g1 = EnvGuard::set("SPOTIFY_PREVIEW_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SPOTIFY_PREVIEW__CATALOG__MARKET", "DE");
    let _g3 = EnvGuard::set("SPOTIFY_PREVIEW__PLAYBACK__SEEK_STEP_SECS", "7");

    let settings = Settings::load().unwrap();
    assert_eq!(settings.catalog.market, "DE");
    assert_eq!(settings.playback.seek_step_secs, 7);
}

#[test]
fn missing_config_file_uses_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let _g1 = EnvGuard::set("SPOTIFY_PREVIEW_CONFIG_PATH", missing.to_str().unwrap());

    let settings = Settings::load().unwrap();
    assert_eq!(settings.catalog.search_limit, 10);
    assert_eq!(settings.playback.seek_step_secs, 5);
}

#[test]
fn validate_requires_catalog_credentials() {
    let err = Settings::default().validate().unwrap_err();
    assert!(err.contains("client_id"));
    valid_settings().validate().unwrap();
}

#[test]
fn validate_rejects_zero_timings() {
    let mut settings = valid_settings();
    settings.playback.poll_interval_ms = 0;
    assert!(settings.validate().unwrap_err().contains("poll_interval_ms"));

    let mut settings = valid_settings();
    settings.playback.preview_duration_secs = 0;
    assert!(settings.validate().unwrap_err().contains("preview_duration_secs"));

    let mut settings = valid_settings();
    settings.playback.seek_step_secs = 0;
    assert!(settings.validate().unwrap_err().contains("seek_step_secs"));
}

#[test]
fn validate_requires_anon_key_with_identity_url() {
    let mut settings = valid_settings();
    settings.identity.url = "https://project.supabase.co".to_string();
    assert!(settings.validate().unwrap_err().contains("anon_key"));
}
