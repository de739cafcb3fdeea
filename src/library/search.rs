//! Playlist filtering.

use super::model::Track;

/// Indices of tracks whose title or artist contains `query`,
/// case-insensitively, in ascending order.
///
/// A blank query matches every track. Pure; never reorders or mutates the
/// playlist it reads.
pub fn matching_indices(tracks: &[Track], query: &str) -> Vec<usize> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return (0..tracks.len()).collect();
    }

    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            t.title.to_lowercase().contains(&q)
                || t.artist
                    .as_deref()
                    .map(|a| a.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect()
}
