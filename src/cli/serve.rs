use crate::{config::Settings, error, info, server::start_api_server, warning};

use super::init_state;

pub async fn serve(settings: Settings) {
    let state = init_state(settings).await;

    if state.tokens.lock().await.access_token().is_none() {
        warning!("No tokens stored yet. Open /authorize or run seasonlike auth.");
    }

    info!("Running on http://{}", state.settings.server_address);
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
