use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTotalResponse {
    pub tracks: PlaylistTracksTotal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksTotal {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    // null for removed or local tracks
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTracksResponse {
    pub items: Vec<TrackRef>,
    pub total: u64,
}

/// One page of an album's track listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumTracksPage {
    pub track_ids: Vec<String>,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDetails {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: AlbumSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDetails {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub playlist: String,
    pub id: String,
    pub tracks: usize,
}

#[derive(Tabled)]
pub struct ReplayTableRow {
    pub metric: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub parameters: Option<TelegramResponseParameters>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramResponseParameters {
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: i64,
    pub chat: Chat,
    pub date: i64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: String,
    pub disable_notification: bool,
    pub reply_parameters: ReplyParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview_options: Option<LinkPreviewOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyParameters {
    pub message_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPreviewOptions {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetReactionRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub reaction: Vec<ReactionType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionType {
    #[serde(rename = "type")]
    pub kind: String,
    pub emoji: String,
}

/// A chat history export as produced by the Telegram desktop client.
///
/// Messages are kept as raw JSON so a single malformed entry can be skipped
/// without rejecting the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub messages: Vec<Value>,
}
