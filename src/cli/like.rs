use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::Settings, error, liker::like_playing_track, success};

use super::init_state;

pub async fn like(settings: Settings) {
    let state = init_state(settings).await;
    let today = Local::now().date_naive();

    let pb = ProgressBar::new_spinner();
    pb.set_message("Liking the playing track...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let mut tokens = state.tokens.lock().await;
    let result = like_playing_track(&state.like_context(), &mut tokens, today).await;
    pb.finish_and_clear();

    match result {
        Ok(liked) => {
            success!(
                "Liked {} - {} and filed the album into {}",
                liked.track.artist_names(),
                liked.track.name,
                liked.season
            );
            for playlist_id in liked.filed_into.iter().skip(1) {
                success!("Also filed into playlist {}", playlist_id);
            }
        }
        Err(e) => error!("Failed to like playing track. Err: {}", e),
    }
}
