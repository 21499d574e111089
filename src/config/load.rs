use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "spotify-preview";
const CONFIG_PATH_VAR: &str = "SPOTIFY_PREVIEW_CONFIG_PATH";
const ENV_PREFIX: &str = "SPOTIFY_PREVIEW";

impl Settings {
    /// Load settings from the optional config file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Basic sanity checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.client_id.trim().is_empty() || self.catalog.client_secret.trim().is_empty() {
            return Err("catalog.client_id and catalog.client_secret must be set".to_string());
        }
        if self.catalog.search_limit == 0 {
            return Err("catalog.search_limit must be >= 1".to_string());
        }
        if self.playback.preview_duration_secs == 0 {
            return Err("playback.preview_duration_secs must be >= 1".to_string());
        }
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if self.playback.seek_step_secs == 0 {
            return Err("playback.seek_step_secs must be >= 1".to_string());
        }
        if self.identity.is_enabled() && self.identity.anon_key.trim().is_empty() {
            return Err("identity.anon_key must be set when identity.url is".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SPOTIFY_PREVIEW_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/spotify-preview/config.toml`, or under `~/.config`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join(APP_DIR).join("config.toml"))
}
