use crate::{
    debug,
    error::Result,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, PlaylistItemsResponse,
        PlaylistTotalResponse,
    },
    utils,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Retrieves the number of items in a playlist.
    ///
    /// Only `tracks.total` is requested so the response stays tiny regardless
    /// of the playlist size.
    pub async fn get_playlist_total(&self, playlist_id: &str) -> Result<u64> {
        let api_url = self.url(&format!(
            "/playlists/{id}?fields=tracks.total",
            id = playlist_id
        ));

        let response = self.execute(|client| client.get(&api_url)).await?;
        let json = response.json::<PlaylistTotalResponse>().await?;

        Ok(json.tracks.total)
    }

    /// Retrieves the track ids of one page of a playlist.
    ///
    /// The `fields` filter limits the payload to `items(track.id)`. Items whose
    /// track is null (local files, removed tracks) are skipped.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of the playlist
    /// * `offset` - Index of the first item to return
    /// * `limit` - Page size, at most 100
    pub async fn get_playlist_page(
        &self,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<String>> {
        let api_url = self.url(&format!(
            "/playlists/{id}/tracks?offset={offset}&limit={limit}&fields=items(track.id)",
            id = playlist_id,
            offset = offset,
            limit = limit
        ));

        let response = self.execute(|client| client.get(&api_url)).await?;
        let json = response.json::<PlaylistItemsResponse>().await?;

        Ok(json
            .items
            .into_iter()
            .filter_map(|item| item.track.and_then(|t| t.id))
            .collect())
    }

    /// Appends a single track to the end of a playlist.
    pub async fn add_track(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        let api_url = self.url(&format!("/playlists/{id}/tracks", id = playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: vec![utils::track_uri(track_id)],
        };

        let response = self
            .execute(|client| client.post(&api_url).json(&body))
            .await?;
        let json = response.json::<AddTrackToPlaylistResponse>().await?;
        debug!(
            "appended {} to {} (snapshot {})",
            track_id, playlist_id, json.snapshot_id
        );

        Ok(())
    }
}
