//! Classification of chat tokens into Spotify links.
//!
//! Matching is a case-sensitive prefix test against the canonical web URLs.
//! Shortened links, other domains and `spotify:` URIs are not recognized.

pub const TRACK_URL: &str = "https://open.spotify.com/track/";
pub const ALBUM_URL: &str = "https://open.spotify.com/album/";

/// A classified chat token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Link {
    Track(String),
    Album(String),
    None,
}

impl Link {
    pub fn id(&self) -> Option<&str> {
        match self {
            Link::Track(id) | Link::Album(id) => Some(id),
            Link::None => None,
        }
    }
}

/// Classifies a single whitespace-free token.
///
/// The id is everything after the prefix up to the first `?`. An empty id is
/// returned as-is; the music service rejects it later.
pub fn classify(token: &str) -> Link {
    if let Some(rest) = token.strip_prefix(TRACK_URL) {
        Link::Track(strip_query(rest).to_string())
    } else if let Some(rest) = token.strip_prefix(ALBUM_URL) {
        Link::Album(strip_query(rest).to_string())
    } else {
        Link::None
    }
}

fn strip_query(rest: &str) -> &str {
    rest.split_once('?').map_or(rest, |(id, _)| id)
}
