//! # Spotify Integration Module
//!
//! Everything the liker needs from the Spotify Web API, behind the narrow
//! [`StreamingApi`] trait so the workflow can run against a recording fake in
//! tests.
//!
//! ## Layout
//!
//! ```text
//! liker (workflow, season playlist)
//!          ↓
//! StreamingApi trait
//!          ↓
//! SpotifyClient
//!     ├── auth      authorize URL, code exchange, token refresh
//!     ├── tracks    currently playing, saved tracks, album tracks, profile
//!     └── playlist  search, create, add and remove items
//!          ↓
//! reqwest → Spotify Web API / accounts service
//! ```
//!
//! ## Errors
//!
//! Every call returns [`ApiError`]. Only [`ApiError::Unauthorized`] is
//! recoverable (by refreshing the access token); the token endpoint reports
//! its failures as [`ApiError::Exchange`] so a rejected refresh token never
//! triggers another refresh.
//!
//! ## Endpoints
//!
//! - `GET /me/player/currently-playing`
//! - `PUT /me/tracks`
//! - `GET /albums/{id}/tracks`
//! - `GET /me`
//! - `GET /search?type=playlist`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{id}/tracks`, `DELETE /playlists/{id}/tracks`
//! - `POST /api/token` (accounts service)

use thiserror::Error;

use crate::types::{PlaylistSummary, TokenResponse, Track};

pub mod auth;
mod client;
pub mod playlist;
pub mod tracks;

pub use auth::{AUTHORIZE_STATE, SCOPES};
pub use client::{REQUEST_TIMEOUT, SpotifyClient, error_message};

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: the access token expired or was revoked.
    #[error("access token rejected: {0}")]
    Unauthorized(String),
    #[error("nothing is currently playing")]
    NothingPlaying,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("spotify responded with {status}: {message}")]
    Status { status: u16, message: String },
    /// The accounts service refused an authorization code or refresh token.
    #[error("token exchange failed: {0}")]
    Exchange(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// The slice of the Spotify Web API used by the liker.
///
/// All user-scoped calls take the access token explicitly; the session that
/// owns it lives in [`crate::management::TokenManager`].
#[allow(async_fn_in_trait)]
pub trait StreamingApi {
    async fn currently_playing(&self, token: &str) -> Result<Track, ApiError>;

    async fn save_tracks(&self, token: &str, track_ids: &[String]) -> Result<(), ApiError>;

    /// URIs of every track on the album, in album order.
    async fn album_track_uris(&self, token: &str, album_id: &str) -> Result<Vec<String>, ApiError>;

    async fn current_user_id(&self, token: &str) -> Result<String, ApiError>;

    async fn search_playlists(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Vec<PlaylistSummary>, ApiError>;

    /// Creates a private, non-collaborative playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<PlaylistSummary, ApiError>;

    async fn remove_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError>;

    async fn add_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError>;

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError>;

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError>;
}

impl StreamingApi for SpotifyClient {
    async fn currently_playing(&self, token: &str) -> Result<Track, ApiError> {
        SpotifyClient::currently_playing(self, token).await
    }

    async fn save_tracks(&self, token: &str, track_ids: &[String]) -> Result<(), ApiError> {
        SpotifyClient::save_tracks(self, token, track_ids).await
    }

    async fn album_track_uris(&self, token: &str, album_id: &str) -> Result<Vec<String>, ApiError> {
        SpotifyClient::album_track_uris(self, token, album_id).await
    }

    async fn current_user_id(&self, token: &str) -> Result<String, ApiError> {
        SpotifyClient::current_user_id(self, token).await
    }

    async fn search_playlists(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Vec<PlaylistSummary>, ApiError> {
        SpotifyClient::search_playlists(self, token, name).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<PlaylistSummary, ApiError> {
        SpotifyClient::create_playlist(self, token, user_id, name).await
    }

    async fn remove_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        SpotifyClient::remove_playlist_tracks(self, token, playlist_id, uris).await
    }

    async fn add_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        SpotifyClient::add_playlist_tracks(self, token, playlist_id, uris).await
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError> {
        SpotifyClient::exchange_code(self, code).await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        SpotifyClient::refresh_access_token(self, refresh_token).await
    }
}
