//! # Liker
//!
//! The only stateful logic of the application:
//!
//! - [`resolve_season_playlist`] finds the playlist named after the current
//!   season, going through the store cache, then a search, then creation.
//! - [`like_playing_track`] likes the playing track and files its album into
//!   the season playlist and every extra playlist, refreshing the access token
//!   a bounded number of times when Spotify rejects it.
//!
//! Both are generic over [`StreamingApi`](crate::spotify::StreamingApi) and
//! [`KeyValueStore`](crate::management::KeyValueStore); the server wires in
//! `SpotifyClient` and `FileStore`.

use thiserror::Error;

use crate::{
    management::{StoreError, TokenError},
    spotify::ApiError,
};

mod season_playlist;
mod workflow;

pub use season_playlist::SEASON_PLAYLIST_TTL_DAYS;
pub use season_playlist::resolve_season_playlist;
pub use workflow::LikeContext;
pub use workflow::LikedTrack;
pub use workflow::MAX_AUTH_RETRIES;
pub use workflow::file_album;
pub use workflow::like_once;
pub use workflow::like_playing_track;

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("no access token stored, open /authorize first")]
    NotAuthorized,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LikeError {
    /// Whether refreshing the access token could make a retry succeed.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LikeError::Api(e) if e.is_unauthorized())
    }
}

impl From<TokenError> for LikeError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Api(e) => LikeError::Api(e),
            TokenError::Store(e) => LikeError::Store(e),
        }
    }
}
