use std::collections::HashSet;

use crate::{debug, error::Result, spotify::MusicService, utils};

/// Maximum number of playlist items the music service returns per request.
pub const PLAYLIST_PAGE_SIZE: u64 = 100;

/// In-memory snapshot of the track ids present in one remote playlist.
///
/// Built once per run by paging through the whole playlist and extended as
/// the sync engine appends. It is never persisted.
#[derive(Debug, Clone)]
pub struct MembershipStore {
    playlist_id: String,
    tracks: HashSet<String>,
}

impl MembershipStore {
    pub fn new(playlist_id: impl Into<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            tracks: HashSet::new(),
        }
    }

    /// Reads every page of a remote playlist and returns its snapshot.
    ///
    /// Issues one total-count request, then `ceil(total / 100)` page requests
    /// at offsets 0, 100, 200, ... Any failed request aborts the load; no
    /// partial snapshot is ever returned.
    pub async fn load<S>(remote: &S, playlist_id: &str) -> Result<Self>
    where
        S: MusicService + ?Sized,
    {
        debug!("loading playlist {}", playlist_id);
        let total = remote.playlist_total(playlist_id).await?;
        let offsets = utils::page_offsets(total, PLAYLIST_PAGE_SIZE);

        let pb = utils::progress_bar(offsets.len() as u64, "Fetching playlist pages");
        let mut store = Self::new(playlist_id);
        for offset in offsets {
            debug!("playlist {} page at offset {}", playlist_id, offset);
            let page = match remote
                .playlist_page(playlist_id, offset, PLAYLIST_PAGE_SIZE)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            };
            store.tracks.extend(page);
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(store)
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.contains(track_id)
    }

    /// Records a track as present. Returns false if it was already known.
    pub fn record(&mut self, track_id: impl Into<String>) -> bool {
        self.tracks.insert(track_id.into())
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
