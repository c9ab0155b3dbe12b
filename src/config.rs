//! Configuration management for tubelist.
//!
//! Client credentials and the default playlist are read once per process,
//! either from a JSON file or from environment variables. Environment
//! variables may be provided through a `.env` file in the local data
//! directory:
//! - Linux: `~/.local/share/tubelist/.env`
//! - macOS: `~/Library/Application Support/tubelist/.env`
//! - Windows: `%LOCALAPPDATA%/tubelist/.env`
//!
//! Required fields are never defaulted. The endpoint urls and scope fall
//! back to the public Google values.

use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/youtube";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Where [`Config::load`] reads from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A JSON document with `clientId`, `clientSecret`, `redirectUrl` and an
    /// optional `playlistId`.
    File(PathBuf),
    /// `TUBELIST_*` variables of the current process.
    Env,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub default_playlist_id: Option<String>,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_url: Option<String>,
    playlist_id: Option<String>,
    scope: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    api_url: Option<String>,
}

impl Config {
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        match source {
            ConfigSource::File(path) => Self::from_path(path),
            ConfigSource::Env => Self::from_env(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(content)?;
        Self::validate(raw)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |name: &str| env::var(name).ok();
        Self::validate(RawConfig {
            client_id: var("TUBELIST_CLIENT_ID"),
            client_secret: var("TUBELIST_CLIENT_SECRET"),
            redirect_url: var("TUBELIST_REDIRECT_URL"),
            playlist_id: var("TUBELIST_PLAYLIST_ID"),
            scope: var("TUBELIST_SCOPE"),
            auth_url: var("TUBELIST_AUTH_URL"),
            token_url: var("TUBELIST_TOKEN_URL"),
            api_url: var("TUBELIST_API_URL"),
        })
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let client_id = required(raw.client_id, "clientId")?;
        let client_secret = required(raw.client_secret, "clientSecret")?;
        let redirect_url = required(raw.redirect_url, "redirectUrl")?;

        // `Url::parse` rejects relative references.
        if let Err(e) = Url::parse(&redirect_url) {
            return Err(ConfigError::InvalidRedirectUrl {
                url: redirect_url,
                reason: e.to_string(),
            });
        }

        Ok(Config {
            client_id,
            client_secret,
            redirect_url,
            default_playlist_id: optional(raw.playlist_id),
            scope: optional(raw.scope).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: optional(raw.auth_url).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional(raw.token_url).unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: optional(raw.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Address the local callback server binds to, derived from the host and
    /// port of the redirect url.
    pub fn callback_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRedirectUrl {
            url: self.redirect_url.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.redirect_url).map_err(|e| invalid(&e.to_string()))?;
        let addrs = url
            .socket_addrs(|| Some(80))
            .map_err(|e| invalid(&e.to_string()))?;
        addrs
            .into_iter()
            .next()
            .ok_or_else(|| invalid("host does not resolve"))
    }

    /// Path component of the redirect url, e.g. `/callback`.
    pub fn callback_path(&self) -> String {
        Url::parse(&self.redirect_url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/callback".to_string())
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Root of everything tubelist keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tubelist");
    path
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.json")
}

pub fn token_path() -> PathBuf {
    data_dir().join("cache/token.json")
}

pub fn pending_auth_path() -> PathBuf {
    data_dir().join("cache/pending_auth.json")
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Loads `TUBELIST_*` variables from the `.env` file in the data directory,
/// if one exists. Variables already set in the environment win.
pub fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| ConfigError::Env(e.to_string()))
}

/// Picks the config file when one exists (explicit `--config` or the default
/// location), the environment otherwise.
pub fn resolve_source(explicit: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::File(path);
    }

    let default = default_config_path();
    if default.is_file() {
        ConfigSource::File(default)
    } else {
        ConfigSource::Env
    }
}
