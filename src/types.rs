use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The access/refresh credential pair, one per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
}

/// Raw payload of the accounts token endpoint.
///
/// `refresh_token` is always present for the authorization code grant and
/// only present on refresh when Spotify rotates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

/// Snapshot of the currently playing track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub album_id: String,
    pub artists: Vec<String>,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists.join(", ")
    }
}

impl From<PlayingItem> for Track {
    fn from(item: PlayingItem) -> Self {
        Track {
            id: item.id,
            name: item.name,
            album_id: item.album.id,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub is_playing: Option<bool>,
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    pub id: String,
    pub name: String,
    pub album: AlbumRef,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTracksResponse {
    pub items: Vec<AlbumTrack>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub id: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTracksRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPlaylistsResponse {
    pub playlists: SearchPlaylistsPage,
}

/// Search pages may contain `null` entries for playlists that are no longer
/// available, hence the `Option`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPlaylistsPage {
    pub items: Vec<Option<Playlist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

/// The parts of a playlist the resolver cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

impl From<Playlist> for PlaylistSummary {
    fn from(playlist: Playlist) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            owner_id: playlist.owner.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksFromPlaylistRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error body of the Web API (`{"error": {"status": 401, "message": ...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

/// Error body of the accounts service (`{"error": "invalid_grant", ...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

/// A single stored value as persisted by the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub value: String,
    /// Milliseconds since the Unix epoch, `None` for entries that never expire.
    pub expires_at: Option<i64>,
}

#[derive(Tabled)]
pub struct StoreEntryRow {
    pub key: String,
    pub value: String,
    pub expires: String,
}
