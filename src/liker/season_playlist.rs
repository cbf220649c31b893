use chrono::TimeDelta;

use crate::{
    info, management::KeyValueStore, spotify::StreamingApi, success, utils::playlist_cache_key,
};

use super::LikeError;

/// How long a resolved season playlist id stays cached.
pub const SEASON_PLAYLIST_TTL_DAYS: i64 = 90;

/// Returns the id of the user's playlist named `season`, creating it if needed.
///
/// # Resolution order
///
/// 1. The store, under [`playlist_cache_key`]. A live entry is returned
///    without touching the API.
/// 2. A playlist search for the exact name, keeping the first result owned
///    by the authorized user. Searching before creating keeps a wiped cache
///    from producing a second "Fall 2026".
/// 3. A new private, non-collaborative playlist.
///
/// Whatever steps 2 or 3 produce is cached for [`SEASON_PLAYLIST_TTL_DAYS`].
pub async fn resolve_season_playlist(
    api: &impl StreamingApi,
    store: &impl KeyValueStore,
    token: &str,
    season: &str,
) -> Result<String, LikeError> {
    let cache_key = playlist_cache_key(season);
    let cached = store.get(&cache_key).await?;
    info!(
        "Looked in cache for {} with key {}, got {:?}",
        season, cache_key, cached
    );

    if let Some(playlist_id) = cached {
        return Ok(playlist_id);
    }

    let user_id = api.current_user_id(token).await?;
    let existing = api
        .search_playlists(token, season)
        .await?
        .into_iter()
        .find(|playlist| playlist.owner_id == user_id && playlist.name == season);

    let playlist_id = match existing {
        Some(playlist) => {
            info!("Found season playlist {}, id: {}", season, playlist.id);
            playlist.id
        }
        None => {
            let created = api.create_playlist(token, &user_id, season).await?;
            success!(
                "No season playlist found, created {}, id: {}",
                season,
                created.id
            );
            created.id
        }
    };

    store
        .set(
            &cache_key,
            &playlist_id,
            Some(TimeDelta::days(SEASON_PLAYLIST_TTL_DAYS)),
        )
        .await?;

    Ok(playlist_id)
}
