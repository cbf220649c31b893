use std::fmt;

use chrono::{Datelike, NaiveDate};

/// The four buckets liked albums are archived into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        write!(f, "{}", name)
    }
}

/// Maps a date to its season and the year the season is labelled with.
///
/// January and February are labelled with the previous year, December with
/// the current one, so the winter starting in December 2025 shows up as
/// `Winter 2025` in December and again in January and February 2026.
pub fn season_for(date: NaiveDate) -> (Season, i32) {
    let year = date.year();
    match date.month() {
        1 | 2 => (Season::Winter, year - 1),
        3..=5 => (Season::Spring, year),
        6..=8 => (Season::Summer, year),
        9..=11 => (Season::Fall, year),
        _ => (Season::Winter, year),
    }
}

/// Name of the season playlist for `date`, e.g. `"Fall 2026"`.
pub fn season_name(date: NaiveDate) -> String {
    let (season, year) = season_for(date);
    format!("{} {}", season, year)
}

/// Store key under which the playlist id of a season is cached.
///
/// Lowercases the label and drops the first space only: `"Fall 2026"`
/// becomes `"fall2026"`.
pub fn playlist_cache_key(season_name: &str) -> String {
    season_name.to_lowercase().replacen(' ', "", 1)
}

/// Shortens a secret for display, keeping the first six characters.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(6).collect();
    if secret.chars().count() > 6 {
        format!("{}…", visible)
    } else {
        visible
    }
}
