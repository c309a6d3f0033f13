//! Live handling of chat messages.
//!
//! Every whitespace-separated token of a message is classified and admitted in
//! order. For each link the chat gets one reply describing the track or album
//! and one reaction on the source message.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Res,
    config::PlaylistIds,
    debug,
    error::Result,
    link::{self, Link},
    spotify::MusicService,
    sync::{Admission, AppendOutcome, PlaylistKind, SyncEngine},
    types::{AlbumDetails, TrackDetails, Update},
    utils, warning,
};

/// Identifies the chat message a reply or reaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// A rendered reply, MarkdownV2 text plus an optional link preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub preview_url: Option<String>,
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, to: MessageRef, reply: &Reply) -> Res<()>;

    async fn react(&self, to: MessageRef, reaction: &str) -> Res<()>;
}

/// Outcome of one token of a message.
#[derive(Debug)]
pub struct TokenResult {
    pub token: String,
    pub link: Link,
    pub result: Result<Admission>,
}

impl TokenResult {
    pub fn outcome(&self) -> Option<AppendOutcome> {
        self.result.as_ref().ok().map(|a| a.outcome)
    }
}

/// Returns the source and text of an update the bot should handle.
///
/// Only plain text messages are handled; updates without a text message and
/// bot commands starting with `/` are ignored.
pub fn dispatchable(update: &Update) -> Option<(MessageRef, &str)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    if text.starts_with('/') {
        return None;
    }
    Some((
        MessageRef {
            chat_id: message.chat.id,
            message_id: message.message_id,
        },
        text,
    ))
}

pub struct Dispatcher<S: ?Sized, K> {
    engine: Arc<SyncEngine<S>>,
    sink: K,
    playlists: PlaylistIds,
}

impl<S, K> Dispatcher<S, K>
where
    S: MusicService + ?Sized,
    K: ReplySink,
{
    pub fn new(engine: Arc<SyncEngine<S>>, sink: K, playlists: PlaylistIds) -> Self {
        Self {
            engine,
            sink,
            playlists,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine<S>> {
        &self.engine
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Admits every token of `text` in order, without talking to the chat.
    pub async fn on_message(&self, text: &str) -> Vec<TokenResult> {
        let mut results = Vec::new();
        for token in utils::tokenize(text) {
            results.push(self.admit_token(token).await);
        }
        results
    }

    /// Admits every token of a chat message and answers each link.
    ///
    /// Each token is fully admitted and answered before the next one starts.
    /// A failed admission is logged and produces no reply.
    pub async fn handle(&self, to: MessageRef, text: &str) -> Vec<TokenResult> {
        let mut results = Vec::new();
        for token in utils::tokenize(text) {
            let result = self.admit_token(token).await;
            self.deliver(to, &result).await;
            results.push(result);
        }
        results
    }

    async fn admit_token(&self, token: &str) -> TokenResult {
        let link = link::classify(token);
        if link != Link::None {
            debug!("admit {}", token);
        }
        let result = self.engine.admit(&link).await;
        TokenResult {
            token: token.to_string(),
            link,
            result,
        }
    }

    async fn deliver(&self, to: MessageRef, result: &TokenResult) {
        let admission = match &result.result {
            Ok(admission) => admission,
            Err(e) => {
                warning!("Cannot add {}: {}", result.token, e);
                return;
            }
        };

        if !admission.failures.is_empty() {
            let failed: Vec<&str> = admission
                .failures
                .iter()
                .map(|f| f.track_id.as_str())
                .collect();
            warning!(
                "{} track(s) of {} could not be added: {}",
                failed.len(),
                result.token,
                failed.join(", ")
            );
        }

        let Some(reaction) = admission.outcome.reaction() else {
            return;
        };

        let reply = self.render(&result.link, admission.outcome).await;
        if let Err(e) = self.sink.reply(to, &reply).await {
            warning!("Failed to send reply: {}", e);
        }
        if let Err(e) = self.sink.react(to, reaction).await {
            warning!("Failed to set reaction: {}", e);
        }
    }

    async fn render(&self, link: &Link, outcome: AppendOutcome) -> Reply {
        let duplicate = !outcome.is_added();
        let (label, playlist_id) = match outcome.playlist() {
            Some(PlaylistKind::Albums) => (&self.playlists.albums_name, &self.playlists.albums),
            _ => (&self.playlists.singles_name, &self.playlists.singles),
        };
        let destination = Destination {
            label,
            url: utils::playlist_url(playlist_id),
            duplicate,
        };

        match link {
            Link::Track(id) => {
                let details = match self.engine.remote().track(id).await {
                    Ok(track) => Some(track),
                    Err(e) => {
                        warning!("Cannot fetch track {}: {}", id, e);
                        None
                    }
                };
                render_track(id, details.as_ref(), &destination)
            }
            Link::Album(id) => {
                let details = match self.engine.remote().album(id).await {
                    Ok(album) => Some(album),
                    Err(e) => {
                        warning!("Cannot fetch album {}: {}", id, e);
                        None
                    }
                };
                render_album(id, details.as_ref(), &destination)
            }
            Link::None => Reply {
                text: String::new(),
                preview_url: None,
            },
        }
    }
}

/// Where a link went, as shown in the reply.
pub struct Destination<'a> {
    pub label: &'a str,
    pub url: String,
    pub duplicate: bool,
}

impl Destination<'_> {
    fn line(&self) -> String {
        format!(
            "\\-\\-\\-{} added to [{}]({})\\-\\-\\-",
            if self.duplicate { " already" } else { "" },
            utils::escape_markdown(self.label),
            utils::escape_link_url(&self.url)
        )
    }
}

pub fn render_track(id: &str, track: Option<&TrackDetails>, to: &Destination<'_>) -> Reply {
    let Some(track) = track else {
        return Reply {
            text: format!("*Track*: {}\n\n{}", utils::escape_markdown(id), to.line()),
            preview_url: None,
        };
    };

    let artist = track.artists.first().map_or("", |a| a.name.as_str());
    Reply {
        text: format!(
            "*Track*: _{name}_ by {artist}\n\n{line}\n\n*Album*: {album} \\- {date}",
            name = utils::escape_markdown(&track.name),
            artist = utils::escape_markdown(artist),
            line = to.line(),
            album = utils::escape_markdown(&track.album.name),
            date = utils::escape_markdown(&track.album.release_date)
        ),
        preview_url: track.album.images.first().map(|i| i.url.clone()),
    }
}

pub fn render_album(id: &str, album: Option<&AlbumDetails>, to: &Destination<'_>) -> Reply {
    let Some(album) = album else {
        return Reply {
            text: format!("*Album*: {}\n\n{}", utils::escape_markdown(id), to.line()),
            preview_url: None,
        };
    };

    let artist = album.artists.first().map_or("", |a| a.name.as_str());
    Reply {
        text: format!(
            "*Album*: _{name}_ by {artist} \\- {date}\n\n{line}",
            name = utils::escape_markdown(&album.name),
            artist = utils::escape_markdown(artist),
            date = utils::escape_markdown(&album.release_date),
            line = to.line()
        ),
        preview_url: album.images.first().map(|i| i.url.clone()),
    }
}
