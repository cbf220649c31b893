use std::slice;

use chrono::NaiveDate;

use crate::{
    info,
    management::{KeyValueStore, TokenManager},
    spotify::{ApiError, StreamingApi},
    success,
    types::Track,
    utils::season_name,
    warning,
};

use super::{LikeError, resolve_season_playlist};

/// How many times a rejected access token is refreshed before giving up.
pub const MAX_AUTH_RETRIES: u32 = 5;

/// Collaborators of a like run.
pub struct LikeContext<'a, A, S> {
    pub api: &'a A,
    pub store: &'a S,
    /// Playlists filed after the season playlist, in this order.
    pub extra_playlists: &'a [String],
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedTrack {
    pub track: Track,
    pub season: String,
    pub playlist_id: String,
    /// Every playlist that received the album, season playlist first.
    pub filed_into: Vec<String>,
}

/// Likes the playing track and files its album, refreshing the token on 401.
///
/// A run that fails because Spotify rejected the access token refreshes the
/// token and starts over from fetching the playing track. After
/// [`MAX_AUTH_RETRIES`] refreshes the next rejection is returned as is. Any
/// other error, including a failed refresh, ends the run immediately.
///
/// Steps that already succeeded before the rejection are repeated on the
/// next attempt; both liking and filing tolerate that.
pub async fn like_playing_track<A, S>(
    ctx: &LikeContext<'_, A, S>,
    tokens: &mut TokenManager,
    today: NaiveDate,
) -> Result<LikedTrack, LikeError>
where
    A: StreamingApi,
    S: KeyValueStore,
{
    let mut retries = 0;

    loop {
        let token = tokens
            .access_token()
            .ok_or(LikeError::NotAuthorized)?
            .to_string();

        match like_once(ctx, &token, today).await {
            Ok(liked) => return Ok(liked),
            Err(e) if e.is_unauthorized() && retries < MAX_AUTH_RETRIES => {
                retries += 1;
                warning!(
                    "{}, refreshing access token ({}/{})",
                    e,
                    retries,
                    MAX_AUTH_RETRIES
                );
                tokens.refresh(ctx.api, ctx.store).await?;
                success!("Refreshed access token");
            }
            Err(e) => return Err(e),
        }
    }
}

/// A single attempt with a fixed access token, no retries.
pub async fn like_once<A, S>(
    ctx: &LikeContext<'_, A, S>,
    token: &str,
    today: NaiveDate,
) -> Result<LikedTrack, LikeError>
where
    A: StreamingApi,
    S: KeyValueStore,
{
    let track = ctx.api.currently_playing(token).await?;

    ctx.api
        .save_tracks(token, slice::from_ref(&track.id))
        .await?;
    success!(
        "Added {} - {} ({}) to library",
        track.artist_names(),
        track.name,
        track.id
    );

    let uris = ctx.api.album_track_uris(token, &track.album_id).await?;

    let season = season_name(today);
    let playlist_id = resolve_season_playlist(ctx.api, ctx.store, token, &season).await?;

    file_album(ctx.api, token, &playlist_id, &uris).await?;
    info!("Filed {} tracks into {}", uris.len(), season);

    let mut filed_into = vec![playlist_id.clone()];
    for extra in ctx.extra_playlists {
        file_album(ctx.api, token, extra, &uris).await?;
        info!("Filed {} tracks into playlist {}", uris.len(), extra);
        filed_into.push(extra.clone());
    }

    Ok(LikedTrack {
        track,
        season,
        playlist_id,
        filed_into,
    })
}

/// Puts the album's tracks into a playlist exactly once.
///
/// Removing first clears copies left by earlier runs; the add then appends a
/// single copy of each track. Removing after the add would drop the new copies
/// as well.
pub async fn file_album(
    api: &impl StreamingApi,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<(), ApiError> {
    if uris.is_empty() {
        return Ok(());
    }

    api.remove_playlist_tracks(token, playlist_id, uris).await?;
    api.add_playlist_tracks(token, playlist_id, uris).await
}
