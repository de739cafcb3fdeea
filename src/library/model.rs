//! Playlist model types: `Track`, `SongEntry` and the `Playlist` container.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::ingest::FoundTrack;

/// Track identifier: milliseconds since the Unix epoch at creation time,
/// bumped when two additions land on the same millisecond.
pub type TrackId = u64;

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    /// Playable source. `None` for tracks restored from a saved snapshot,
    /// which carry metadata only until their file is added again.
    pub source: Option<PathBuf>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Whether this track has a source the engine can decode.
    pub fn is_playable(&self) -> bool {
        self.source.is_some()
    }
}

/// Persisted shape of one playlist row. Metadata only; sources never leave
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongEntry {
    pub id: TrackId,
    pub name: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

/// Ordered, user-editable track list. Duplicates are allowed; order is
/// significant.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    last_id: TrackId,
}

/// "Artist - Title", or just the title when no artist is known.
pub fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Allocate the next track id: wall-clock millis, kept strictly
    /// increasing across rapid additions.
    fn next_id(&mut self) -> TrackId {
        let id = now_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Append one found track, assigning it a fresh id. Returns the new id.
    pub fn add(&mut self, found: FoundTrack) -> TrackId {
        let id = self.next_id();
        let display = make_display(&found.title, found.artist.as_deref());
        self.tracks.push(Track {
            id,
            title: found.title,
            artist: found.artist,
            source: Some(found.source),
            duration: found.duration,
            display,
        });
        id
    }

    /// Append all found tracks in order. Returns the number added.
    pub fn extend(&mut self, found: Vec<FoundTrack>) -> usize {
        let n = found.len();
        for f in found {
            self.add(f);
        }
        n
    }

    /// Record the decoded duration for the track at `index`. Returns true
    /// when this changed the stored value.
    pub fn set_duration(&mut self, index: usize, duration: Duration) -> bool {
        match self.tracks.get_mut(index) {
            Some(t) if t.duration != Some(duration) => {
                t.duration = Some(duration);
                true
            }
            _ => false,
        }
    }

    /// Remove and return the track at `index`. Out-of-range indices are a
    /// no-op. The track's source path is dropped with the value.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Drop every track. Keeps `last_id` so ids stay unique across clears.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Swap the track at `index` with the one above it. Returns true when a
    /// move happened.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index > 0 && index < self.tracks.len() {
            self.tracks.swap(index, index - 1);
            true
        } else {
            false
        }
    }

    /// Swap the track at `index` with the one below it. Returns true when a
    /// move happened.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 < self.tracks.len() {
            self.tracks.swap(index, index + 1);
            true
        } else {
            false
        }
    }

    /// Metadata-only projection of the playlist, in order.
    pub fn snapshot(&self) -> Vec<SongEntry> {
        self.tracks
            .iter()
            .map(|t| SongEntry {
                id: t.id,
                name: t.title.clone(),
                artist: t.artist.clone(),
                duration_secs: t.duration.map(|d| d.as_secs()),
            })
            .collect()
    }

    /// Replace the playlist contents from a saved snapshot. Restored tracks
    /// have no source and stay unplayable until their files are added again.
    pub fn restore(&mut self, entries: Vec<SongEntry>) {
        self.tracks = entries
            .into_iter()
            .map(|e| {
                let display = make_display(&e.name, e.artist.as_deref());
                Track {
                    id: e.id,
                    title: e.name,
                    artist: e.artist,
                    source: None,
                    duration: e.duration_secs.map(Duration::from_secs),
                    display,
                }
            })
            .collect();
        // Future additions must not collide with restored ids.
        let max_restored = self.tracks.iter().map(|t| t.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_restored);
    }
}
