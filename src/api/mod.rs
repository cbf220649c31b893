//! # API Module
//!
//! HTTP endpoints of the web hook. Every handler receives the shared
//! [`AppState`](crate::server::AppState) through an axum `Extension`.
//!
//! ## Endpoints
//!
//! - [`authorize`] - `GET /authorize`, answers with the Spotify authorization
//!   URL to open in a browser.
//! - [`callback`] - `GET /callback?code=...`, the redirect target of the
//!   authorization; exchanges the code and stores the token pair.
//! - [`like`] - `GET /like`, likes the playing track and files its album.
//! - [`health`] - `GET /health`, status and version for monitoring.
//!
//! ## Error exposure
//!
//! Handlers log the full error server side and answer with a fixed text.
//! Upstream error bodies never reach the HTTP client.

mod authorize;
mod callback;
mod health;
mod like;

pub use authorize::authorize;
pub use callback::callback;
pub use health::health;
pub use like::like;

/// Body sent for every failure that is not the caller's fault.
pub const GENERIC_FAILURE: &str = "Something went wrong";
