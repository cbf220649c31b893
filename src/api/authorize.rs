use std::sync::Arc;

use axum::{Extension, http::StatusCode};

use crate::{server::AppState, spotify::AUTHORIZE_STATE, warning};

use super::GENERIC_FAILURE;

pub async fn authorize(Extension(state): Extension<Arc<AppState>>) -> (StatusCode, String) {
    match state.client.authorize_url(AUTHORIZE_STATE) {
        Ok(url) => (StatusCode::OK, format!("Authorization URL: {}", url)),
        Err(e) => {
            warning!("Failed to build authorization URL: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
        }
    }
}
