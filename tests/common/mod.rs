#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use tunedrop::{
    Res,
    config::PlaylistIds,
    dispatch::{MessageRef, Reply, ReplySink},
    error::{Result, SyncError},
    spotify::MusicService,
    types::{AlbumDetails, AlbumSummary, AlbumTracksPage, ArtistRef, Image, TrackDetails},
};

pub const SINGLES: &str = "singles-playlist";
pub const ALBUMS: &str = "albums-playlist";

pub fn playlists() -> PlaylistIds {
    PlaylistIds {
        singles: SINGLES.to_string(),
        singles_name: "Singles".to_string(),
        albums: ALBUMS.to_string(),
        albums_name: "Albums".to_string(),
    }
}

pub fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Total(String),
    Page { playlist: String, offset: u64, limit: u64 },
    AlbumPage { album: String, offset: u64, limit: u64 },
    Append { playlist: String, track: String },
    Track(String),
    Album(String),
}

#[derive(Default)]
struct State {
    playlists: HashMap<String, Vec<String>>,
    albums: HashMap<String, Vec<String>>,
    calls: Vec<Call>,
    failing_pages: HashSet<(String, u64)>,
    failing_appends: HashSet<String>,
    failing_metadata: bool,
}

/// In-memory music service that records every call it receives.
#[derive(Default)]
pub struct FakeMusicService {
    state: Mutex<State>,
}

impl FakeMusicService {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.set_playlist(SINGLES, Vec::new());
        fake.set_playlist(ALBUMS, Vec::new());
        fake
    }

    pub fn set_playlist(&self, playlist: &str, tracks: Vec<String>) {
        self.state
            .lock()
            .unwrap()
            .playlists
            .insert(playlist.to_string(), tracks);
    }

    pub fn set_album(&self, album: &str, tracks: Vec<String>) {
        self.state
            .lock()
            .unwrap()
            .albums
            .insert(album.to_string(), tracks);
    }

    pub fn fail_page(&self, playlist: &str, offset: u64) {
        self.state
            .lock()
            .unwrap()
            .failing_pages
            .insert((playlist.to_string(), offset));
    }

    pub fn fail_append(&self, track: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_appends
            .insert(track.to_string());
    }

    pub fn fail_metadata(&self) {
        self.state.lock().unwrap().failing_metadata = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn page_offsets(&self, playlist: &str) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Page { playlist: p, offset, .. } if p == playlist => Some(offset),
                _ => None,
            })
            .collect()
    }

    /// Tracks appended to `playlist`, in call order.
    pub fn appended(&self, playlist: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Append { playlist: p, track } if p == playlist => Some(track),
                _ => None,
            })
            .collect()
    }

    pub fn append_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Append { .. }))
            .count()
    }

    pub fn playlist(&self, playlist: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .get(playlist)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn not_found(what: &str) -> SyncError {
    SyncError::RemoteRejected {
        status: 404,
        message: format!("{} not found", what),
    }
}

#[async_trait]
impl MusicService for FakeMusicService {
    async fn playlist_total(&self, playlist_id: &str) -> Result<u64> {
        self.record(Call::Total(playlist_id.to_string()));
        let state = self.state.lock().unwrap();
        state
            .playlists
            .get(playlist_id)
            .map(|tracks| tracks.len() as u64)
            .ok_or_else(|| not_found(playlist_id))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<String>> {
        self.record(Call::Page {
            playlist: playlist_id.to_string(),
            offset,
            limit,
        });
        let state = self.state.lock().unwrap();
        if state
            .failing_pages
            .contains(&(playlist_id.to_string(), offset))
        {
            return Err(SyncError::RemoteUnavailable("503 Service Unavailable".to_string()));
        }
        let tracks = state
            .playlists
            .get(playlist_id)
            .ok_or_else(|| not_found(playlist_id))?;
        Ok(tracks
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn album_tracks_page(
        &self,
        album_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<AlbumTracksPage> {
        self.record(Call::AlbumPage {
            album: album_id.to_string(),
            offset,
            limit,
        });
        let state = self.state.lock().unwrap();
        let tracks = state.albums.get(album_id).ok_or_else(|| not_found(album_id))?;
        Ok(AlbumTracksPage {
            track_ids: tracks
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect(),
            total: tracks.len() as u64,
        })
    }

    async fn append_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        self.record(Call::Append {
            playlist: playlist_id.to_string(),
            track: track_id.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if state.failing_appends.contains(track_id) {
            return Err(SyncError::RemoteUnavailable("connection reset".to_string()));
        }
        state
            .playlists
            .entry(playlist_id.to_string())
            .or_default()
            .push(track_id.to_string());
        Ok(())
    }

    async fn track(&self, track_id: &str) -> Result<TrackDetails> {
        self.record(Call::Track(track_id.to_string()));
        if self.state.lock().unwrap().failing_metadata {
            return Err(SyncError::RemoteUnavailable("timed out".to_string()));
        }
        Ok(TrackDetails {
            id: track_id.to_string(),
            name: format!("Song {}", track_id),
            artists: vec![ArtistRef {
                name: "The Band".to_string(),
            }],
            album: AlbumSummary {
                name: "The Record".to_string(),
                release_date: "2024-03-01".to_string(),
                images: vec![Image {
                    url: format!("https://img.example/{}", track_id),
                }],
            },
        })
    }

    async fn album(&self, album_id: &str) -> Result<AlbumDetails> {
        self.record(Call::Album(album_id.to_string()));
        if self.state.lock().unwrap().failing_metadata {
            return Err(SyncError::RemoteUnavailable("timed out".to_string()));
        }
        Ok(AlbumDetails {
            id: album_id.to_string(),
            name: format!("LP {}", album_id),
            artists: vec![ArtistRef {
                name: "The Band".to_string(),
            }],
            release_date: "2023-11-10".to_string(),
            images: vec![Image {
                url: format!("https://img.example/{}", album_id),
            }],
        })
    }
}

/// Chat sink that keeps every reply and reaction.
#[derive(Default)]
pub struct RecordingSink {
    pub replies: Mutex<Vec<(MessageRef, Reply)>>,
    pub reactions: Mutex<Vec<(MessageRef, String)>>,
}

impl RecordingSink {
    pub fn replies(&self) -> Vec<Reply> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub fn reactions(&self) -> Vec<String> {
        self.reactions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, reaction)| reaction.clone())
            .collect()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn reply(&self, to: MessageRef, reply: &Reply) -> Res<()> {
        self.replies.lock().unwrap().push((to, reply.clone()));
        Ok(())
    }

    async fn react(&self, to: MessageRef, reaction: &str) -> Res<()> {
        self.reactions
            .lock()
            .unwrap()
            .push((to, reaction.to_string()));
        Ok(())
    }
}
