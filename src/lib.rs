//! Seasonal Spotify liker
//!
//! This library implements a small personal web hook around the Spotify Web
//! API. A single request likes the track that is currently playing and files
//! the whole album into a playlist named after the current season, plus a fixed
//! list of extra playlists, without ever duplicating entries.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for `/authorize`, `/callback`, `/like` and `/health`
//! - `cli` - Terminal commands wrapping the server and the workflow
//! - `config` - Environment loading and the `Settings` struct
//! - `liker` - Season playlist resolution and the like-and-file workflow
//! - `management` - Persistent key-value store and the token session
//! - `server` - Shared state and the axum server
//! - `spotify` - Spotify Web API client behind the `StreamingApi` trait
//! - `types` - Data structures exchanged with Spotify and the store
//! - `utils` - Season naming and cache key helpers
//!
//! # Example
//!
//! ```
//! use seasonlike::{config, utils};
//!
//! #[tokio::main]
//! async fn main() -> seasonlike::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     println!("{}", utils::season_name(chrono::Local::now().date_naive()));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod liker;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used by the binary's top level commands.
///
/// Library code returns typed errors; this boxed variant lets `main` and the
/// CLI collect any of them with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue bullet.
///
/// ```
/// info!("Looked in cache for {}", season);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
///
/// ```
/// success!("Added {} to library", track);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line and terminates the process with exit code 1.
///
/// Only meant for failures that leave nothing to serve, such as a missing
/// client id at startup. Request handlers log with [`warning!`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow warning line.
///
/// Used for every recoverable failure: rejected tokens, failed filing runs,
/// token exchange errors.
///
/// ```
/// warning!("Access token rejected, refreshing ({}/{})", retry, max);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
