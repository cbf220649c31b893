use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    Res, api,
    config::Settings,
    liker::LikeContext,
    management::{FileStore, TokenManager},
    spotify::SpotifyClient,
};

/// Everything the handlers share.
///
/// `tokens` is locked for the whole duration of a `/like` or `/callback`
/// request, so requests inside one process run one after the other. The
/// client timeout bounds how long one request can hold it. Two processes
/// pointed at the same store are not coordinated.
pub struct AppState {
    pub settings: Settings,
    pub client: SpotifyClient,
    pub store: FileStore,
    pub tokens: Mutex<TokenManager>,
}

impl AppState {
    /// Opens the store, restores the persisted token pair and builds the
    /// Spotify client.
    pub async fn init(settings: Settings) -> Res<Self> {
        let store = FileStore::open(&settings.storage_dir).await?;
        let tokens = TokenManager::load(&store).await?;
        let client = SpotifyClient::new(&settings)?;

        Ok(Self {
            settings,
            client,
            store,
            tokens: Mutex::new(tokens),
        })
    }

    pub fn like_context(&self) -> LikeContext<'_, SpotifyClient, FileStore> {
        LikeContext {
            api: &self.client,
            store: &self.store,
            extra_playlists: &self.settings.extra_playlists,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/authorize", get(api::authorize))
        .route("/callback", get(api::callback))
        .route("/like", get(api::like))
        .layer(Extension(state))
}

pub async fn start_api_server(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&state.settings.server_address)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
