use reqwest::StatusCode;

use crate::types::{
    AlbumTracksResponse, CurrentUserResponse, CurrentlyPlayingResponse, SaveTracksRequest, Track,
};

use super::{ApiError, SpotifyClient, client::check};

/// Page size used when walking an album's track list (the API maximum).
const ALBUM_TRACKS_PAGE: u32 = 50;

impl SpotifyClient {
    /// Fetches the track the user is listening to right now.
    ///
    /// Spotify answers `204 No Content` when playback is stopped and a `null`
    /// item for anything that is not a track (ads, podcast episodes); both
    /// surface as [`ApiError::NothingPlaying`].
    pub async fn currently_playing(&self, token: &str) -> Result<Track, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/me/player/currently-playing"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = check(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Err(ApiError::NothingPlaying);
        }

        let json = response.json::<CurrentlyPlayingResponse>().await?;
        json.item.map(Track::from).ok_or(ApiError::NothingPlaying)
    }

    /// Adds tracks to the user's Liked Songs. Saving a track twice is a no-op.
    pub async fn save_tracks(&self, token: &str, track_ids: &[String]) -> Result<(), ApiError> {
        let response = self
            .http
            .put(self.endpoint("/me/tracks"))
            .bearer_auth(token)
            .json(&SaveTracksRequest {
                ids: track_ids.to_vec(),
            })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Collects the URIs of every track on an album, following pagination.
    pub async fn album_track_uris(
        &self,
        token: &str,
        album_id: &str,
    ) -> Result<Vec<String>, ApiError> {
        let mut uris = Vec::new();
        let mut next = Some(self.endpoint(&format!(
            "/albums/{id}/tracks?limit={limit}",
            id = album_id,
            limit = ALBUM_TRACKS_PAGE
        )));

        while let Some(api_url) = next {
            let response = self.http.get(&api_url).bearer_auth(token).send().await?;
            let page = check(response)
                .await?
                .json::<AlbumTracksResponse>()
                .await?;

            uris.extend(page.items.into_iter().map(|track| track.uri));
            next = page.next;
        }

        Ok(uris)
    }

    pub async fn current_user_id(&self, token: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .get(self.endpoint("/me"))
            .bearer_auth(token)
            .send()
            .await?;
        let user = check(response).await?.json::<CurrentUserResponse>().await?;
        Ok(user.id)
    }
}
