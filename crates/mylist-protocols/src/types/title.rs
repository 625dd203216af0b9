//! Playlist titles.

use chrono::{DateTime, Local};

/// Resolve the playlist title: the given one, or `MyList_YYYYMMDD_HHMMSS`
/// when it is absent or blank.
pub fn resolve_title(title: Option<&str>) -> String {
    resolve_title_at(title, Local::now())
}

/// [`resolve_title`] with an explicit clock.
pub fn resolve_title_at(title: Option<&str>, now: DateTime<Local>) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => format!("MyList_{}", now.format("%Y%m%d_%H%M%S")),
    }
}
