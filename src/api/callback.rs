use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode};
use serde::Deserialize;

use crate::{info, server::AppState, success, warning};

use super::GENERIC_FAILURE;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set by Spotify instead of `code` when the user denied access.
    pub error: Option<String>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> (StatusCode, &'static str) {
    let Some(code) = params.code else {
        warning!(
            "Callback without authorization code (error: {})",
            params.error.as_deref().unwrap_or("none")
        );
        return (StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    info!("Got code, requesting tokens...");
    let mut tokens = state.tokens.lock().await;

    match tokens.authorize(&state.client, &state.store, &code).await {
        Ok(response) => {
            success!(
                "Tokens saved, access token expires in {} seconds",
                response.expires_in
            );
            (StatusCode::OK, "Tokens saved!")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            (StatusCode::BAD_GATEWAY, GENERIC_FAILURE)
        }
    }
}
