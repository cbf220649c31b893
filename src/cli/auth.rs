use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    config::Settings,
    error, info,
    server::{AppState, start_api_server},
    spotify::AUTHORIZE_STATE,
    success,
    types::Token,
    warning,
};

use super::init_state;

const MAX_WAIT: Duration = Duration::from_secs(120);

/// Runs the authorization code flow from the terminal.
///
/// Starts the callback server in the background, opens the authorization URL
/// in the default browser and waits for `/callback` to store a token pair
/// that differs from the one stored before. Spotify must be able to redirect
/// the browser to `{HOST}:{PORT}/callback`, so the configured redirect has to
/// point at this machine.
pub async fn auth(settings: Settings) {
    let state = init_state(settings).await;
    let previous = state.tokens.lock().await.current_token().cloned();

    let auth_url = match state.client.authorize_url(AUTHORIZE_STATE) {
        Ok(url) => url,
        Err(e) => error!("Failed to build authorization URL. Err: {}", e),
    };

    let server_state = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped. Err: {}", e);
        }
    });

    info!("Waiting for callback on {}", state.client.redirect_url());
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(&state, previous).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the session until a new token pair shows up or [`MAX_WAIT`] passed.
async fn wait_for_token(state: &AppState, previous: Option<Token>) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < MAX_WAIT {
        let current = state.tokens.lock().await.current_token().cloned();
        if current.is_some() && current != previous {
            return current;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
