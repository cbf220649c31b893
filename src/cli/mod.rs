//! # CLI Module
//!
//! Terminal entry points of the binary. The web hook itself is `serve`; the
//! other commands exist for setting it up and poking at it from a shell.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP server until the process is stopped.
//! - [`auth`] - Runs the server in the background, opens the authorization
//!   URL in a browser and waits until `/callback` stored a new token pair.
//! - [`like`] - Likes and files the playing track once, without HTTP.
//! - [`info`] - Shows the current season and what the store holds.
//!
//! ## Usage
//!
//! ```bash
//! seasonlike auth      # authorize once, tokens land in the store
//! seasonlike serve     # then point a shortcut or button at GET /like
//! seasonlike like      # or like from the terminal
//! seasonlike info      # check cached season playlists
//! ```
//!
//! All commands read their configuration from the environment (see
//! [`crate::config`]). Fatal setup failures end the process through
//! [`error!`](crate::error).

use std::sync::Arc;

use crate::{config::Settings, error, server::AppState};

mod auth;
mod info;
mod like;
mod serve;

pub use auth::auth;
pub use info::info;
pub use like::like;
pub use serve::serve;

async fn init_state(settings: Settings) -> Arc<AppState> {
    match AppState::init(settings).await {
        Ok(state) => Arc::new(state),
        Err(e) => error!("Failed to initialize. Err: {}", e),
    }
}
