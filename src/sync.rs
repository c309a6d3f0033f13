//! The sync engine: decides whether a link is new and mirrors it remotely.
//!
//! Track links go to the singles playlist, every track of an album link goes
//! to the albums playlist. Each playlist's snapshot sits behind its own async
//! mutex which is held for the whole check-append-record sequence, so two
//! concurrent `admit` calls can never insert the same track twice.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::PlaylistIds,
    debug,
    error::{Result, SyncError, TrackFailure},
    link::Link,
    management::MembershipStore,
    spotify::MusicService,
    utils,
};

/// Maximum number of album tracks the catalog returns per request.
pub const ALBUM_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaylistKind {
    Singles,
    Albums,
}

/// Result of admitting one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppendOutcome {
    NotALink,
    DuplicateTrack,
    DuplicateAlbum,
    AddedTrack,
    /// At least one track of the album was newly appended.
    AddedAlbum,
}

impl AppendOutcome {
    /// Reaction set on the source message, `None` for non-links.
    pub fn reaction(self) -> Option<&'static str> {
        match self {
            AppendOutcome::AddedTrack | AppendOutcome::AddedAlbum => Some("❤"),
            AppendOutcome::DuplicateTrack | AppendOutcome::DuplicateAlbum => Some("🙈"),
            AppendOutcome::NotALink => None,
        }
    }

    pub fn is_added(self) -> bool {
        matches!(self, AppendOutcome::AddedTrack | AppendOutcome::AddedAlbum)
    }

    pub fn playlist(self) -> Option<PlaylistKind> {
        match self {
            AppendOutcome::AddedTrack | AppendOutcome::DuplicateTrack => {
                Some(PlaylistKind::Singles)
            }
            AppendOutcome::AddedAlbum | AppendOutcome::DuplicateAlbum => {
                Some(PlaylistKind::Albums)
            }
            AppendOutcome::NotALink => None,
        }
    }
}

/// What `admit` did for a single link.
#[derive(Debug)]
pub struct Admission {
    pub outcome: AppendOutcome,
    /// Track ids appended remotely, in append order.
    pub appended: Vec<String>,
    /// Album tracks whose append failed while siblings succeeded.
    pub failures: Vec<TrackFailure>,
}

impl Admission {
    fn new(outcome: AppendOutcome) -> Self {
        Self {
            outcome,
            appended: Vec::new(),
            failures: Vec::new(),
        }
    }
}

pub struct SyncEngine<S: ?Sized> {
    remote: Arc<S>,
    singles: Mutex<MembershipStore>,
    albums: Mutex<MembershipStore>,
}

impl<S> SyncEngine<S>
where
    S: MusicService + ?Sized,
{
    pub fn new(remote: Arc<S>, singles: MembershipStore, albums: MembershipStore) -> Self {
        Self {
            remote,
            singles: Mutex::new(singles),
            albums: Mutex::new(albums),
        }
    }

    /// Loads both playlist snapshots and returns a ready engine.
    ///
    /// Fails if either playlist cannot be read completely. Serving with a
    /// partial snapshot would re-insert tracks that are already present.
    pub async fn bootstrap(remote: Arc<S>, playlists: &PlaylistIds) -> Result<Self> {
        let singles = MembershipStore::load(remote.as_ref(), &playlists.singles).await?;
        let albums = MembershipStore::load(remote.as_ref(), &playlists.albums).await?;
        Ok(Self::new(remote, singles, albums))
    }

    pub fn remote(&self) -> &Arc<S> {
        &self.remote
    }

    /// Number of known tracks in the singles and albums snapshots.
    pub async fn snapshot_sizes(&self) -> (usize, usize) {
        let singles = self.singles.lock().await.len();
        let albums = self.albums.lock().await.len();
        (singles, albums)
    }

    pub async fn is_member(&self, playlist: PlaylistKind, track_id: &str) -> bool {
        match playlist {
            PlaylistKind::Singles => self.singles.lock().await.contains(track_id),
            PlaylistKind::Albums => self.albums.lock().await.contains(track_id),
        }
    }

    /// Admits a classified link.
    ///
    /// A track is appended unless already known. An album is expanded and only
    /// its unknown tracks are appended, in catalog order. A failed track append
    /// is an error and records nothing. A failed album track does not stop its
    /// siblings; the failures are returned with the admission, and only if no
    /// track at all could be appended does the whole album fail.
    pub async fn admit(&self, link: &Link) -> Result<Admission> {
        match link {
            Link::Track(id) => self.admit_track(id).await,
            Link::Album(id) => self.admit_album(id).await,
            Link::None => Ok(Admission::new(AppendOutcome::NotALink)),
        }
    }

    async fn admit_track(&self, track_id: &str) -> Result<Admission> {
        let mut singles = self.singles.lock().await;
        if singles.contains(track_id) {
            debug!("track {} already in singles", track_id);
            return Ok(Admission::new(AppendOutcome::DuplicateTrack));
        }

        self.remote
            .append_to_playlist(singles.playlist_id(), track_id)
            .await?;
        singles.record(track_id);

        let mut admission = Admission::new(AppendOutcome::AddedTrack);
        admission.appended.push(track_id.to_string());
        Ok(admission)
    }

    async fn admit_album(&self, album_id: &str) -> Result<Admission> {
        let mut albums = self.albums.lock().await;
        let track_ids = self.album_track_ids(album_id).await?;

        let mut appended = Vec::new();
        let mut failures = Vec::new();
        for track_id in track_ids {
            if albums.contains(&track_id) {
                continue;
            }
            match self
                .remote
                .append_to_playlist(albums.playlist_id(), &track_id)
                .await
            {
                Ok(()) => {
                    albums.record(track_id.clone());
                    appended.push(track_id);
                }
                Err(error) => {
                    debug!("cannot append album track {}: {}", track_id, error);
                    failures.push(TrackFailure { track_id, error });
                }
            }
        }

        if appended.is_empty() && !failures.is_empty() {
            return Err(SyncError::AlbumAppend {
                album_id: album_id.to_string(),
                failures,
            });
        }

        let outcome = if appended.is_empty() {
            AppendOutcome::DuplicateAlbum
        } else {
            AppendOutcome::AddedAlbum
        };
        Ok(Admission {
            outcome,
            appended,
            failures,
        })
    }

    /// Reads an album's full track listing, page by page, in catalog order.
    pub async fn album_track_ids(&self, album_id: &str) -> Result<Vec<String>> {
        let first = self
            .remote
            .album_tracks_page(album_id, 0, ALBUM_PAGE_SIZE)
            .await?;
        let mut track_ids = first.track_ids;

        for offset in utils::page_offsets(first.total, ALBUM_PAGE_SIZE)
            .into_iter()
            .skip(1)
        {
            let page = self
                .remote
                .album_tracks_page(album_id, offset, ALBUM_PAGE_SIZE)
                .await?;
            track_ids.extend(page.track_ids);
        }

        Ok(track_ids)
    }
}
