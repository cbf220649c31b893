use std::{collections::HashMap, sync::Mutex};

use chrono::{NaiveDate, TimeDelta};
use seasonlike::liker::{
    LikeContext, LikeError, MAX_AUTH_RETRIES, SEASON_PLAYLIST_TTL_DAYS, file_album,
    like_playing_track, resolve_season_playlist,
};
use seasonlike::management::{
    ACCESS_TOKEN_KEY, KeyValueStore, REFRESH_TOKEN_KEY, StoreError, TokenManager,
};
use seasonlike::spotify::{ApiError, StreamingApi};
use seasonlike::types::{PlaylistSummary, Token, TokenResponse, Track};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CurrentlyPlaying(String),
    SaveTracks(Vec<String>),
    AlbumTracks(String),
    CurrentUser,
    Search(String),
    Create(String, String),
    Remove(String, Vec<String>),
    Add(String, Vec<String>),
    Exchange(String),
    Refresh(String),
}

// Scripted Spotify that records every call in order
struct FakeSpotify {
    calls: Mutex<Vec<Call>>,
    track: Option<Track>,
    album_uris: Vec<String>,
    user_id: String,
    search_results: Vec<PlaylistSummary>,
    created_id: String,
    unauthorized_left: Mutex<u32>,
    refreshes: Mutex<u32>,
    fail_refresh: bool,
    rotate_refresh_token: bool,
}

impl FakeSpotify {
    fn new() -> Self {
        FakeSpotify {
            calls: Mutex::new(Vec::new()),
            track: Some(track("T1", "AL1")),
            album_uris: uris(&["u1", "u2"]),
            user_id: "me".to_string(),
            search_results: Vec::new(),
            created_id: "new-playlist".to_string(),
            unauthorized_left: Mutex::new(0),
            refreshes: Mutex::new(0),
            fail_refresh: false,
            rotate_refresh_token: false,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn refresh_count(&self) -> u32 {
        *self.refreshes.lock().unwrap()
    }
}

impl StreamingApi for FakeSpotify {
    async fn currently_playing(&self, token: &str) -> Result<Track, ApiError> {
        self.record(Call::CurrentlyPlaying(token.to_string()));
        let mut left = self.unauthorized_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(ApiError::Unauthorized("The access token expired".to_string()));
        }
        self.track.clone().ok_or(ApiError::NothingPlaying)
    }

    async fn save_tracks(&self, _token: &str, track_ids: &[String]) -> Result<(), ApiError> {
        self.record(Call::SaveTracks(track_ids.to_vec()));
        Ok(())
    }

    async fn album_track_uris(&self, _token: &str, album_id: &str) -> Result<Vec<String>, ApiError> {
        self.record(Call::AlbumTracks(album_id.to_string()));
        Ok(self.album_uris.clone())
    }

    async fn current_user_id(&self, _token: &str) -> Result<String, ApiError> {
        self.record(Call::CurrentUser);
        Ok(self.user_id.clone())
    }

    async fn search_playlists(
        &self,
        _token: &str,
        name: &str,
    ) -> Result<Vec<PlaylistSummary>, ApiError> {
        self.record(Call::Search(name.to_string()));
        Ok(self.search_results.clone())
    }

    async fn create_playlist(
        &self,
        _token: &str,
        user_id: &str,
        name: &str,
    ) -> Result<PlaylistSummary, ApiError> {
        self.record(Call::Create(user_id.to_string(), name.to_string()));
        Ok(PlaylistSummary {
            id: self.created_id.clone(),
            name: name.to_string(),
            owner_id: user_id.to_string(),
        })
    }

    async fn remove_playlist_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.record(Call::Remove(playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }

    async fn add_playlist_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.record(Call::Add(playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.record(Call::Exchange(code.to_string()));
        Ok(token_response("granted-access", Some("granted-refresh")))
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.record(Call::Refresh(refresh_token.to_string()));
        let mut refreshes = self.refreshes.lock().unwrap();
        *refreshes += 1;

        if self.fail_refresh {
            return Err(ApiError::Exchange("invalid_grant".to_string()));
        }

        let access = format!("fresh-{}", *refreshes);
        let rotated = self.rotate_refresh_token.then_some("rotated-refresh");
        Ok(token_response(&access, rotated))
    }
}

#[derive(Default)]
struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Option<TimeDelta>)>>,
}

impl MemoryStore {
    fn ttl_of(&self, key: &str) -> Option<TimeDelta> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .and_then(|(_, ttl)| *ttl)
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<TimeDelta>) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

fn track(id: &str, album_id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: "Song".to_string(),
        album_id: album_id.to_string(),
        artists: vec!["Artist A".to_string(), "Artist B".to_string()],
    }
}

fn uris(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn playlist(id: &str, name: &str, owner: &str) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: owner.to_string(),
    }
}

fn token_response(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        scope: String::new(),
        expires_in: 3600,
        refresh_token: refresh.map(String::from),
    }
}

fn session() -> TokenManager {
    TokenManager::new(Token {
        access_token: "stale".to_string(),
        refresh_token: "refresh".to_string(),
    })
}

fn spring_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
}

#[tokio::test]
async fn test_resolver_returns_cached_playlist_without_api_calls() {
    let api = FakeSpotify::new();
    let store = MemoryStore::default();
    store.set("spring2024", "cached-id", None).await.unwrap();

    let id = resolve_season_playlist(&api, &store, "token", "Spring 2024")
        .await
        .unwrap();

    assert_eq!(id, "cached-id");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_resolver_reuses_owned_playlist_with_exact_name() {
    let mut api = FakeSpotify::new();
    api.search_results = vec![
        playlist("p-other", "Spring 2024", "someone-else"),
        playlist("p-mix", "Spring 2024 Mix", "me"),
        playlist("p-mine", "Spring 2024", "me"),
        playlist("p-mine-too", "Spring 2024", "me"),
    ];
    let store = MemoryStore::default();

    let id = resolve_season_playlist(&api, &store, "token", "Spring 2024")
        .await
        .unwrap();

    assert_eq!(id, "p-mine");
    assert_eq!(
        api.calls(),
        vec![Call::CurrentUser, Call::Search("Spring 2024".to_string())]
    );
    assert_eq!(
        store.get("spring2024").await.unwrap().as_deref(),
        Some("p-mine")
    );
    assert_eq!(
        store.ttl_of("spring2024"),
        Some(TimeDelta::days(SEASON_PLAYLIST_TTL_DAYS))
    );
}

#[tokio::test]
async fn test_resolver_creates_playlist_once_when_search_misses() {
    let mut api = FakeSpotify::new();
    api.search_results = vec![playlist("p-other", "Spring 2024", "someone-else")];
    let store = MemoryStore::default();

    let id = resolve_season_playlist(&api, &store, "token", "Spring 2024")
        .await
        .unwrap();

    assert_eq!(id, "new-playlist");
    let creates: Vec<Call> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Create(..)))
        .collect();
    assert_eq!(
        creates,
        vec![Call::Create("me".to_string(), "Spring 2024".to_string())]
    );

    // Second resolution is served from the cache
    let again = resolve_season_playlist(&api, &store, "token", "Spring 2024")
        .await
        .unwrap();
    assert_eq!(again, "new-playlist");
    assert_eq!(api.calls().len(), 3);
}

#[tokio::test]
async fn test_file_album_removes_before_adding_whole_album() {
    let api = FakeSpotify::new();
    let album = uris(&["A", "B", "C"]);

    file_album(&api, "token", "playlist", &album).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::Remove("playlist".to_string(), album.clone()),
            Call::Add("playlist".to_string(), album),
        ]
    );
}

#[tokio::test]
async fn test_file_album_skips_empty_album() {
    let api = FakeSpotify::new();

    file_album(&api, "token", "playlist", &[]).await.unwrap();

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_like_files_album_into_new_season_playlist_and_extras() {
    let api = FakeSpotify::new();
    let store = MemoryStore::default();
    let extras = vec!["extra-1".to_string(), "extra-2".to_string()];
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &extras,
    };
    let mut tokens = session();

    let liked = like_playing_track(&ctx, &mut tokens, spring_day())
        .await
        .unwrap();

    let album = uris(&["u1", "u2"]);
    assert_eq!(
        api.calls(),
        vec![
            Call::CurrentlyPlaying("stale".to_string()),
            Call::SaveTracks(vec!["T1".to_string()]),
            Call::AlbumTracks("AL1".to_string()),
            Call::CurrentUser,
            Call::Search("Spring 2024".to_string()),
            Call::Create("me".to_string(), "Spring 2024".to_string()),
            Call::Remove("new-playlist".to_string(), album.clone()),
            Call::Add("new-playlist".to_string(), album.clone()),
            Call::Remove("extra-1".to_string(), album.clone()),
            Call::Add("extra-1".to_string(), album.clone()),
            Call::Remove("extra-2".to_string(), album.clone()),
            Call::Add("extra-2".to_string(), album),
        ]
    );

    assert_eq!(
        store.get("spring2024").await.unwrap().as_deref(),
        Some("new-playlist")
    );
    assert_eq!(store.ttl_of("spring2024"), Some(TimeDelta::days(90)));

    assert_eq!(liked.track.id, "T1");
    assert_eq!(liked.season, "Spring 2024");
    assert_eq!(liked.playlist_id, "new-playlist");
    assert_eq!(liked.filed_into, vec!["new-playlist", "extra-1", "extra-2"]);
}

#[tokio::test]
async fn test_like_refreshes_rejected_token_and_restarts() {
    let api = FakeSpotify::new();
    *api.unauthorized_left.lock().unwrap() = 2;
    let store = MemoryStore::default();
    store.set("spring2024", "cached-id", None).await.unwrap();
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &[],
    };
    let mut tokens = session();

    let liked = like_playing_track(&ctx, &mut tokens, spring_day())
        .await
        .unwrap();

    assert_eq!(liked.playlist_id, "cached-id");
    assert_eq!(api.refresh_count(), 2);

    let playing_tokens: Vec<Call> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::CurrentlyPlaying(_)))
        .collect();
    assert_eq!(
        playing_tokens,
        vec![
            Call::CurrentlyPlaying("stale".to_string()),
            Call::CurrentlyPlaying("fresh-1".to_string()),
            Call::CurrentlyPlaying("fresh-2".to_string()),
        ]
    );

    assert_eq!(tokens.access_token(), Some("fresh-2"));
    assert_eq!(
        store.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("fresh-2")
    );
}

#[tokio::test]
async fn test_like_gives_up_after_max_refreshes() {
    let api = FakeSpotify::new();
    *api.unauthorized_left.lock().unwrap() = 6;
    let store = MemoryStore::default();
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &[],
    };
    let mut tokens = session();

    let result = like_playing_track(&ctx, &mut tokens, spring_day()).await;

    assert!(matches!(result, Err(ref e) if e.is_unauthorized()));
    assert_eq!(api.refresh_count(), MAX_AUTH_RETRIES);
    assert_eq!(api.refresh_count(), 5);
    assert!(!api.calls().contains(&Call::SaveTracks(vec!["T1".to_string()])));
}

#[tokio::test]
async fn test_like_does_not_retry_other_errors() {
    let mut api = FakeSpotify::new();
    api.track = None;
    let store = MemoryStore::default();
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &[],
    };
    let mut tokens = session();

    let result = like_playing_track(&ctx, &mut tokens, spring_day()).await;

    assert!(matches!(
        result,
        Err(LikeError::Api(ApiError::NothingPlaying))
    ));
    assert_eq!(api.refresh_count(), 0);
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_like_stops_when_refresh_fails() {
    let mut api = FakeSpotify::new();
    api.fail_refresh = true;
    *api.unauthorized_left.lock().unwrap() = 1;
    let store = MemoryStore::default();
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &[],
    };
    let mut tokens = session();

    let result = like_playing_track(&ctx, &mut tokens, spring_day()).await;

    assert!(matches!(result, Err(LikeError::Api(ApiError::Exchange(_)))));
    assert_eq!(api.refresh_count(), 1);
}

#[tokio::test]
async fn test_like_requires_stored_tokens() {
    let api = FakeSpotify::new();
    let store = MemoryStore::default();
    let ctx = LikeContext {
        api: &api,
        store: &store,
        extra_playlists: &[],
    };
    let mut tokens = TokenManager::load(&store).await.unwrap();

    let result = like_playing_track(&ctx, &mut tokens, spring_day()).await;

    assert!(matches!(result, Err(LikeError::NotAuthorized)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_authorize_persists_token_pair() {
    let api = FakeSpotify::new();
    let store = MemoryStore::default();
    let mut tokens = TokenManager::default();

    tokens.authorize(&api, &store, "the-code").await.unwrap();

    assert_eq!(api.calls(), vec![Call::Exchange("the-code".to_string())]);
    assert_eq!(tokens.access_token(), Some("granted-access"));
    assert_eq!(
        store.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("granted-access")
    );
    assert_eq!(
        store.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
        Some("granted-refresh")
    );

    let reloaded = TokenManager::load(&store).await.unwrap();
    assert_eq!(
        reloaded.current_token(),
        Some(&Token {
            access_token: "granted-access".to_string(),
            refresh_token: "granted-refresh".to_string(),
        })
    );
}

#[tokio::test]
async fn test_refresh_keeps_rotated_refresh_token() {
    let mut api = FakeSpotify::new();
    api.rotate_refresh_token = true;
    let store = MemoryStore::default();
    let mut tokens = session();

    tokens.refresh(&api, &store).await.unwrap();

    assert_eq!(api.calls(), vec![Call::Refresh("refresh".to_string())]);
    assert_eq!(
        tokens.current_token().map(|t| t.refresh_token.as_str()),
        Some("rotated-refresh")
    );
    assert_eq!(
        store.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(),
        Some("rotated-refresh")
    );
}

#[tokio::test]
async fn test_refresh_without_rotation_keeps_refresh_token() {
    let api = FakeSpotify::new();
    let store = MemoryStore::default();
    let mut tokens = session();

    tokens.refresh(&api, &store).await.unwrap();

    assert_eq!(tokens.access_token(), Some("fresh-1"));
    assert_eq!(
        tokens.current_token().map(|t| t.refresh_token.as_str()),
        Some("refresh")
    );
    assert_eq!(store.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
}
