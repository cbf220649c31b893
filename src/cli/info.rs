use chrono::{DateTime, Local, Utc};
use tabled::Table;

use crate::{
    config::Settings,
    error, info,
    management::{ACCESS_TOKEN_KEY, FileStore, REFRESH_TOKEN_KEY},
    types::StoreEntryRow,
    utils, warning,
};

/// Prints the current season, its cache key and every live store entry.
///
/// Token values are shortened so the output can be pasted into an issue.
///
/// ```bash
/// seasonlike info
/// [o] Current season: Fall 2026 (cache key fall2026)
/// ╭──────────────┬─────────┬──────────────────╮
/// │ key          │ value   │ expires          │
/// ...
/// ```
pub async fn info(settings: Settings) {
    let season = utils::season_name(Local::now().date_naive());
    info!(
        "Current season: {} (cache key {})",
        season,
        utils::playlist_cache_key(&season)
    );

    let store = match FileStore::open(&settings.storage_dir).await {
        Ok(store) => store,
        Err(e) => error!("Failed to open token store. Err: {}", e),
    };
    info!("Store: {}", store.path().display());

    let entries = store.entries().await;
    if entries.is_empty() {
        warning!("Store is empty. Run seasonlike auth first.");
        return;
    }

    let rows: Vec<StoreEntryRow> = entries
        .into_iter()
        .map(|(key, entry)| {
            let value = if key == ACCESS_TOKEN_KEY || key == REFRESH_TOKEN_KEY {
                utils::mask_secret(&entry.value)
            } else {
                entry.value
            };
            let expires = entry
                .expires_at
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());

            StoreEntryRow {
                key,
                value,
                expires,
            }
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}
