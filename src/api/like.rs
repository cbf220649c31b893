use std::sync::Arc;

use axum::{Extension, http::StatusCode};
use chrono::Local;

use crate::{info, liker::like_playing_track, server::AppState, success, warning};

use super::GENERIC_FAILURE;

pub async fn like(Extension(state): Extension<Arc<AppState>>) -> (StatusCode, &'static str) {
    info!("/like requested...");

    let mut tokens = state.tokens.lock().await;
    let today = Local::now().date_naive();

    match like_playing_track(&state.like_context(), &mut tokens, today).await {
        Ok(liked) => {
            success!(
                "Filed {} - {} into {} playlists",
                liked.track.artist_names(),
                liked.track.name,
                liked.filed_into.len()
            );
            (StatusCode::OK, "Liked track!")
        }
        Err(e) => {
            warning!("Failed to like playing track: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
        }
    }
}
