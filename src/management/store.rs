use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{TimeDelta, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::types::StoreEntry;

pub const STORE_FILE: &str = "store.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Flat string key-value persistence with optional per-entry expiry.
///
/// Expired entries behave exactly like missing ones.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str, ttl: Option<TimeDelta>) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Key-value store backed by a single JSON document on disk.
///
/// The whole map is read once when the store is opened and written back after
/// every mutation. A mutation whose write fails leaves memory untouched, so
/// `get` never returns a value the file does not hold.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, StoreEntry>>,
}

impl FileStore {
    /// Opens (or lazily creates) `store.json` inside `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = dir.as_ref().join(STORE_FILE);
        let entries = match async_fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All unexpired entries, sorted by key.
    pub async fn entries(&self) -> Vec<(String, StoreEntry)> {
        let now = now_millis();
        let entries = self.entries.lock().await;
        let mut live: Vec<(String, StoreEntry)> = entries
            .iter()
            .filter(|(_, entry)| !is_expired(entry, now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));
        live
    }

    async fn persist(&self, entries: &HashMap<String, StoreEntry>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|entry| !is_expired(entry, now_millis()))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<TimeDelta>) -> Result<(), StoreError> {
        let now = now_millis();
        let mut entries = self.entries.lock().await;

        let mut next = entries.clone();
        next.retain(|_, entry| !is_expired(entry, now));
        next.insert(
            key.to_string(),
            StoreEntry {
                value: value.to_string(),
                expires_at: ttl.map(|ttl| now + ttl.num_milliseconds()),
            },
        );

        // Memory only changes once the file does.
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

pub fn is_expired(entry: &StoreEntry, now_millis: i64) -> bool {
    entry.expires_at.is_some_and(|at| at <= now_millis)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
