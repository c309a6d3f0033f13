//! # CLI Module
//!
//! This module provides the command implementations behind the `tunedrop`
//! binary. Each command wires configuration, the Spotify client and the sync
//! core together and reports progress on the console.
//!
//! ## Commands
//!
//! - [`listen`] - Seeds both playlist snapshots, then answers chat messages
//! - [`backlog`] - Replays a chat export in order, optionally continuing to listen
//! - [`info`] - Shows the size of both playlists
//!
//! ## Startup Policy
//!
//! Every command first loads complete snapshots of both playlists. If that
//! fails the process exits before touching the chat or any playlist: a
//! partial snapshot would cause tracks already present to be added again.
//!
//! ## Usage Patterns
//!
//! ```bash
//! tunedrop listen                         # Mirror links as they are posted
//! tunedrop backlog --read result.json     # Import an exported chat history
//! tunedrop backlog --listen               # Import, then keep listening
//! tunedrop info                           # Show playlist sizes
//! ```

mod backlog;
mod info;
mod listen;

use std::sync::Arc;

pub use backlog::backlog;
pub use info::info;
pub use listen::listen;

use crate::{
    config::{self, PlaylistIds},
    error,
    management::TokenManager,
    spotify::SpotifyClient,
};

fn load_playlists() -> PlaylistIds {
    match config::playlists() {
        Ok(playlists) => playlists,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

async fn connect_spotify() -> Arc<SpotifyClient> {
    let tokens = match TokenManager::load().await {
        Ok(tokens) => tokens,
        Err(e) => error!("Failed to load Spotify token: {}", e),
    };

    let timeout = match config::remote_timeout() {
        Ok(timeout) => timeout,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match SpotifyClient::new(config::spotify_apiurl(), timeout, tokens) {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Cannot create Spotify client: {}", e),
    }
}
