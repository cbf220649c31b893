//! Configuration for the seasonal liker.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. There are no command-line flags: the
//! process is meant to run unattended behind a reverse proxy or on a small
//! home server, configured once.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults for the optional values

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse .env file: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Loads environment variables from `.env` in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/seasonlike/.env`
/// - macOS: `~/Library/Application Support/seasonlike/.env`
/// - Windows: `%LOCALAPPDATA%/seasonlike/.env`
///
/// A missing file is not an error, the variables may come straight from the
/// environment (for example a container or a systemd unit). Variables that
/// are already set are never overridden.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Root of everything the application writes to disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("seasonlike");
    path
}

/// Runtime settings, read once at startup and handed to whatever needs them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    /// Public base of the server including the scheme, e.g. `http://pi.local`.
    pub host: String,
    pub port: String,
    /// Address the HTTP server binds to.
    pub server_address: String,
    /// Playlists that receive every liked album besides the season playlist.
    pub extra_playlists: Vec<String>,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub storage_dir: PathBuf,
}

impl Settings {
    /// Builds the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET`, `HOST` or `PORT` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            host: required("HOST")?,
            port: required("PORT")?,
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            extra_playlists: parse_playlist_ids(&optional("EXTRA_PLAYLIST_IDS", "")),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            storage_dir: env::var("SEASONLIKE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir().join("storage")),
        })
    }

    /// The OAuth redirect URL registered with Spotify, `{host}:{port}/callback`.
    pub fn redirect_url(&self) -> String {
        format!("{}:{}/callback", self.host, self.port)
    }
}

/// Splits a comma separated list of playlist ids, keeping their order.
///
/// ```
/// let ids = parse_playlist_ids("37i9dQ, 5ABHKGoO ,");
/// assert_eq!(ids, vec!["37i9dQ", "5ABHKGoO"]);
/// ```
pub fn parse_playlist_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
