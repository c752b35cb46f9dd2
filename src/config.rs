//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::error::ConfigError;
use crate::storage::TOKEN_STORAGE_KEY;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

const APP_NAME: &str = "tournament-master";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeouts: Timeouts,
    /// Where the bearer token is persisted. `None` means the client runs
    /// without durable storage.
    pub token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: default `http://localhost:3000`
    /// - `TM_REQUEST_TIMEOUT_SECS`: default 10
    /// - `TM_CONNECT_TIMEOUT_SECS`: default 5
    /// - `TM_TOKEN_FILE`: default `<platform config dir>/tournament-master/token`
    /// - `TM_DURABLE_STORAGE`: `0` or `false` disables token persistence
    ///
    /// # Errors
    ///
    /// Returns an error if `API_BASE_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = parse_base_url(lookup("API_BASE_URL").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("TM_REQUEST_TIMEOUT_SECS").as_deref(), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("TM_CONNECT_TIMEOUT_SECS").as_deref(), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let token_file = if durable_storage_disabled(lookup("TM_DURABLE_STORAGE").as_deref()) {
            None
        } else {
            lookup("TM_TOKEN_FILE").map(PathBuf::from).or_else(default_token_file)
        };

        Ok(Self { api_base_url, timeouts, token_file })
    }

    /// Config pointing at `api_base_url` with default timeouts and no durable storage.
    #[must_use]
    pub fn ephemeral(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_owned(),
            timeouts: Timeouts::default(),
            token_file: None,
        }
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let raw = raw.unwrap_or(DEFAULT_API_BASE_URL).trim();
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    match raw.map(str::parse::<u64>) {
        Some(Ok(value)) => value,
        _ => default,
    }
}

fn durable_storage_disabled(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("0" | "false" | "off" | "no"))
}

fn default_token_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(TOKEN_STORAGE_KEY))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
