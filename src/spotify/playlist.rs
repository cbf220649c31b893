use crate::types::{
    AddTracksToPlaylistRequest, CreatePlaylistRequest, Playlist, PlaylistSummary,
    RemoveTracksFromPlaylistRequest, SearchPlaylistsResponse, SnapshotResponse, TrackUri,
};

use super::{ApiError, SpotifyClient, client::check};

/// Maximum number of items per add/remove request accepted by the Web API.
pub const PLAYLIST_CHUNK: usize = 100;

const SEARCH_LIMIT: &str = "50";

impl SpotifyClient {
    /// Searches public and owned playlists by name.
    ///
    /// Only the first page is returned. Entries Spotify reports as `null` are
    /// dropped.
    pub async fn search_playlists(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Vec<PlaylistSummary>, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/search"))
            .query(&[("q", name), ("type", "playlist"), ("limit", SEARCH_LIMIT)])
            .bearer_auth(token)
            .send()
            .await?;

        let json = check(response)
            .await?
            .json::<SearchPlaylistsResponse>()
            .await?;

        Ok(json
            .playlists
            .items
            .into_iter()
            .flatten()
            .map(PlaylistSummary::from)
            .collect())
    }

    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<PlaylistSummary, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("/users/{user_id}/playlists")))
            .bearer_auth(token)
            .json(&CreatePlaylistRequest {
                name: name.to_string(),
                public: false,
                collaborative: false,
            })
            .send()
            .await?;

        let playlist = check(response).await?.json::<Playlist>().await?;
        Ok(playlist.into())
    }

    /// Removes every occurrence of the given URIs from the playlist.
    pub async fn remove_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        let api_url = self.endpoint(&format!("/playlists/{playlist_id}/tracks"));

        for chunk in uris.chunks(PLAYLIST_CHUNK) {
            let body = RemoveTracksFromPlaylistRequest {
                tracks: chunk
                    .iter()
                    .map(|uri| TrackUri { uri: uri.clone() })
                    .collect(),
            };
            let response = self
                .http
                .delete(&api_url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?;
            check(response).await?.json::<SnapshotResponse>().await?;
        }

        Ok(())
    }

    /// Appends the URIs to the end of the playlist, in order.
    pub async fn add_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        let api_url = self.endpoint(&format!("/playlists/{playlist_id}/tracks"));

        for chunk in uris.chunks(PLAYLIST_CHUNK) {
            let response = self
                .http
                .post(&api_url)
                .bearer_auth(token)
                .json(&AddTracksToPlaylistRequest {
                    uris: chunk.to_vec(),
                })
                .send()
                .await?;
            check(response).await?.json::<SnapshotResponse>().await?;
        }

        Ok(())
    }
}
