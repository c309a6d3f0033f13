use crate::{
    error::Result,
    types::{AlbumDetails, AlbumTracksPage, AlbumTracksResponse, TrackDetails},
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Retrieves one page of an album's track listing.
    ///
    /// The catalog caps album track pages at 50 items. The reported total lets
    /// the caller decide whether another page is needed.
    pub async fn get_album_tracks(
        &self,
        album_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<AlbumTracksPage> {
        let api_url = self.url(&format!(
            "/albums/{id}/tracks?offset={offset}&limit={limit}",
            id = album_id,
            offset = offset,
            limit = limit
        ));

        let response = self.execute(|client| client.get(&api_url)).await?;
        let json = response.json::<AlbumTracksResponse>().await?;

        Ok(AlbumTracksPage {
            track_ids: json.items.into_iter().filter_map(|t| t.id).collect(),
            total: json.total,
        })
    }

    pub async fn get_track(&self, track_id: &str) -> Result<TrackDetails> {
        let api_url = self.url(&format!("/tracks/{id}", id = track_id));
        let response = self.execute(|client| client.get(&api_url)).await?;
        Ok(response.json::<TrackDetails>().await?)
    }

    pub async fn get_album(&self, album_id: &str) -> Result<AlbumDetails> {
        let api_url = self.url(&format!("/albums/{id}", id = album_id));
        let response = self.execute(|client| client.get(&api_url)).await?;
        Ok(response.json::<AlbumDetails>().await?)
    }
}
