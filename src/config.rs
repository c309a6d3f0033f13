//! Configuration management for the chat playlist mirror.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify and Telegram credentials and the two target
//! playlists.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity of the two playlists the bot writes to.
///
/// Both ids are read once at startup. The labels only feed reply rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistIds {
    pub singles: String,
    pub singles_name: String,
    pub albums: String,
    pub albums_name: String,
}

/// Loads environment variables from `.env` files.
///
/// A `.env` in the working directory is read first, then the one in the
/// platform-specific local data directory under `tunedrop/.env`. Variables
/// already present in the process environment are never overwritten, and a
/// missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunedrop/.env`
/// - macOS: `~/Library/Application Support/tunedrop/.env`
/// - Windows: `%LOCALAPPDATA%/tunedrop/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn load_env() -> Result<(), ConfigError> {
    let _ = dotenv::dotenv();

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        let _ = dotenv::from_path(path);
    }
    Ok(())
}

/// Returns `<data_local_dir>/tunedrop`, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunedrop");
    path
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns both playlist identities (`SINGLES_PLAYLIST`, `ALBUMS_PLAYLIST`).
///
/// The optional `SINGLES_PLAYLIST_NAME` and `ALBUMS_PLAYLIST_NAME` label the
/// playlists in chat replies.
pub fn playlists() -> Result<PlaylistIds, ConfigError> {
    Ok(PlaylistIds {
        singles: required("SINGLES_PLAYLIST")?,
        singles_name: optional("SINGLES_PLAYLIST_NAME", "Singles"),
        albums: required("ALBUMS_PLAYLIST")?,
        albums_name: optional("ALBUMS_PLAYLIST_NAME", "Albums"),
    })
}

/// Returns the Spotify API client ID (`SPOTIFY_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_ID")
}

/// Returns the Spotify API client secret (`SPOTIFY_SECRET`).
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_SECRET")
}

/// Returns the refresh token used to seed the token cache, if configured.
pub fn spotify_refresh_token() -> Option<String> {
    env::var("SPOTIFY_REFRESH_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the Spotify Web API base URL.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Returns the Spotify OAuth token URL used for refreshing access tokens.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Returns the Telegram bot token (`TELEGRAM_TOKEN`).
pub fn telegram_token() -> Result<String, ConfigError> {
    required("TELEGRAM_TOKEN")
}

/// Returns the Telegram Bot API base URL.
pub fn telegram_apiurl() -> String {
    optional("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Returns the bounded timeout applied to every remote request.
///
/// Reads `REMOTE_TIMEOUT_SECS`, defaulting to 30 seconds.
pub fn remote_timeout() -> Result<Duration, ConfigError> {
    let raw = optional("REMOTE_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string());
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::Invalid {
            key: "REMOTE_TIMEOUT_SECS",
            reason: e.to_string(),
        })?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key: "REMOTE_TIMEOUT_SECS",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
