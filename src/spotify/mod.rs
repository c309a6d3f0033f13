//! # Spotify Integration Module
//!
//! This module is the only place that talks to the Spotify Web API. It exposes
//! the [`MusicService`] trait, the narrow remote-store interface the sync core
//! depends on, and [`SpotifyClient`], its `reqwest` implementation.
//!
//! ## Architecture
//!
//! ```text
//! Sync Core (membership snapshots, sync engine, replay)
//!          ↓
//! MusicService trait
//!          ↓
//! SpotifyClient
//!     ├── Playlist Operations (total, pages, append)
//!     └── Catalog Operations (album tracks, track/album metadata)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}?fields=tracks.total` - Playlist size
//! - `GET /playlists/{id}/tracks` - Playlist pages, only `items(track.id)`
//! - `POST /playlists/{id}/tracks` - Append a single track
//! - `GET /albums/{id}/tracks` - Album track listing pages
//! - `GET /tracks/{id}` and `GET /albums/{id}` - Reply metadata
//!
//! ## Error Handling
//!
//! Every call maps failures onto [`SyncError`]:
//! - **Transport errors and timeouts** become `RemoteUnavailable`
//! - **5xx** responses become `RemoteUnavailable`
//! - **4xx** responses become `RemoteRejected`
//!
//! Rate limiting (429) honours the `Retry-After` header up to 120 seconds and a
//! 502 Bad Gateway is retried after 10 seconds. Both are bounded to
//! [`MAX_ATTEMPTS`] tries so a flapping service surfaces as an error instead of
//! stalling the bot forever.
//!
//! ## Thread Safety
//!
//! The client is `Send + Sync`; the token manager sits behind an async mutex so
//! a refresh happens at most once at a time.

mod catalog;
mod playlists;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    debug,
    error::{Result, SyncError},
    management::TokenManager,
    types::{AlbumDetails, AlbumTracksPage, TrackDetails},
    warning,
};

pub const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_BACKOFF: Duration = Duration::from_secs(10);

/// Remote playlist store and catalog consumed by the sync core.
#[async_trait]
pub trait MusicService: Send + Sync {
    /// Number of items currently in a playlist.
    async fn playlist_total(&self, playlist_id: &str) -> Result<u64>;

    /// Track ids of one playlist page. Items without a track id are dropped.
    async fn playlist_page(&self, playlist_id: &str, offset: u64, limit: u64)
    -> Result<Vec<String>>;

    /// One page of an album's track listing, in catalog order.
    async fn album_tracks_page(
        &self,
        album_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<AlbumTracksPage>;

    /// Appends a single track to the end of a playlist.
    async fn append_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()>;

    async fn track(&self, track_id: &str) -> Result<TrackDetails>;

    async fn album(&self, album_id: &str) -> Result<AlbumDetails>;
}

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client whose every request is bounded by `timeout`.
    pub fn new(api_url: String, timeout: Duration, tokens: TokenManager) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("tunedrop/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Sends an authorized request, retrying rate limits and bad gateways.
    async fn execute<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 1;
        loop {
            let token = self.tokens.lock().await.get_valid_token(&self.http).await?;
            let response = match build(&self.http).bearer_auth(token).send().await {
                Ok(resp) => resp,
                Err(err) if err.is_timeout() => {
                    return Err(SyncError::RemoteUnavailable(format!(
                        "request timed out: {}",
                        err
                    )));
                }
                Err(err) => return Err(SyncError::RemoteUnavailable(err.to_string())),
            };

            let status = response.status();
            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        debug!("rate limited, retrying in {} seconds", retry_after);
                        sleep(Duration::from_secs(retry_after)).await;
                        attempt += 1;
                        continue;
                    }
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds.",
                        retry_after
                    );
                } else if status == StatusCode::BAD_GATEWAY {
                    sleep(BAD_GATEWAY_BACKOFF).await;
                    attempt += 1;
                    continue;
                }
            }

            return Ok(response.error_for_status()?);
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn playlist_total(&self, playlist_id: &str) -> Result<u64> {
        self.get_playlist_total(playlist_id).await
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<String>> {
        self.get_playlist_page(playlist_id, offset, limit).await
    }

    async fn album_tracks_page(
        &self,
        album_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<AlbumTracksPage> {
        self.get_album_tracks(album_id, offset, limit).await
    }

    async fn append_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        self.add_track(playlist_id, track_id).await
    }

    async fn track(&self, track_id: &str) -> Result<TrackDetails> {
        self.get_track(track_id).await
    }

    async fn album(&self, album_id: &str) -> Result<AlbumDetails> {
        self.get_album(album_id).await
    }
}
