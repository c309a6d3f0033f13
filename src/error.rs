//! Error types for the sync core.

use thiserror::Error;

use crate::backlog::ReplaySummary;

/// Errors raised while talking to the music service or importing history.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure, timeout or 5xx from the music service
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// 4xx from the music service (bad id, permissions, rate limit)
    #[error("remote rejected request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// A chat export entry without a usable text field
    #[error("malformed history record #{index}: {reason}")]
    MalformedHistoryRecord { index: usize, reason: String },

    /// Every novel track of an album failed to append
    #[error("failed to append {} track(s) of album {album_id}", .failures.len())]
    AlbumAppend {
        album_id: String,
        failures: Vec<TrackFailure>,
    },

    /// A remote failure stopped a backlog replay midway
    #[error(
        "backlog replay aborted after {} message(s) ({} track(s) appended): {source}",
        .summary.messages,
        .summary.appended
    )]
    ReplayAborted {
        summary: ReplaySummary,
        source: Box<SyncError>,
    },

    /// The chat export could not be read or parsed
    #[error("cannot read chat history: {0}")]
    History(String),

    /// No usable access token
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// A single track of an album expansion whose append failed.
#[derive(Debug)]
pub struct TrackFailure {
    pub track_id: String,
    pub error: SyncError,
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.is_client_error() => SyncError::RemoteRejected {
                status: status.as_u16(),
                message: err.to_string(),
            },
            _ => SyncError::RemoteUnavailable(err.to_string()),
        }
    }
}

/// Result type for sync core operations.
pub type Result<T> = std::result::Result<T, SyncError>;
