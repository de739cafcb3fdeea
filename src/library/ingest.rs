//! File and directory ingestion.
//!
//! Accepts a single audio file or a directory walked according to the
//! library settings. File type is decided by guessed MIME type; display
//! metadata comes from an "Artist - Title" file stem heuristic and the
//! duration from the audio headers when they can be read.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::make_display;

/// A playable file discovered during ingestion, before it gets a playlist id.
#[derive(Debug, Clone)]
pub struct FoundTrack {
    pub source: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

/// Outcome of ingesting a path: the tracks found plus how many files were
/// passed over as non-audio.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub found: Vec<FoundTrack>,
    pub skipped: usize,
}

fn is_audio_file(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.type_() == mime_guess::mime::AUDIO)
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Split a file stem on the first " - " into artist and title.
/// A stem with no separator is all title.
fn split_stem(stem: &str) -> (String, Option<String>) {
    match stem.split_once(" - ") {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            (title.trim().to_string(), Some(artist.trim().to_string()))
        }
        _ => (stem.trim().to_string(), None),
    }
}

fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

fn found_from_file(path: &Path) -> FoundTrack {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");
    let (title, artist) = split_stem(stem);
    FoundTrack {
        source: path.to_path_buf(),
        title,
        artist,
        duration: probe_duration(path),
    }
}

/// Ingest `path`. Non-audio files are counted, not errors; a missing path
/// simply produces an empty report.
pub fn collect(path: &Path, settings: &LibrarySettings) -> IngestReport {
    let mut report = IngestReport::default();

    if path.is_file() {
        if is_audio_file(path) {
            report.found.push(found_from_file(path));
        } else {
            report.skipped += 1;
        }
        return report;
    }

    let mut walker = WalkDir::new(path).follow_links(settings.follow_links);

    // With recursion off the walk stops at the root's direct children.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        if !is_audio_file(p) {
            report.skipped += 1;
            continue;
        }
        report.found.push(found_from_file(p));
    }

    // Directory walks land in a deterministic order regardless of filesystem
    // iteration order.
    report.found.sort_by(|a, b| {
        let da = make_display(&a.title, a.artist.as_deref()).to_lowercase();
        let db = make_display(&b.title, b.artist.as_deref()).to_lowercase();
        da.cmp(&db)
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn split_stem_on_first_separator_only() {
        assert_eq!(
            split_stem("Artist - Title"),
            ("Title".to_string(), Some("Artist".to_string()))
        );
        assert_eq!(
            split_stem("A - B - C"),
            ("B - C".to_string(), Some("A".to_string()))
        );
        assert_eq!(split_stem("Just A Title"), ("Just A Title".to_string(), None));
        assert_eq!(split_stem(" - Title"), ("- Title".to_string(), None));
        assert_eq!(split_stem("Artist - "), ("Artist -".to_string(), None));
    }

    #[test]
    fn is_audio_file_uses_guessed_mime_type() {
        assert!(is_audio_file(Path::new("/tmp/a.mp3")));
        assert!(is_audio_file(Path::new("/tmp/a.MP3")));
        assert!(is_audio_file(Path::new("/tmp/a.flac")));
        assert!(is_audio_file(Path::new("/tmp/a.ogg")));
        assert!(is_audio_file(Path::new("/tmp/a.wav")));
        assert!(!is_audio_file(Path::new("/tmp/a.txt")));
        assert!(!is_audio_file(Path::new("/tmp/a.jpg")));
        assert!(!is_audio_file(Path::new("/tmp/a")));
    }

    #[test]
    fn collect_counts_non_audio_as_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"not a real jpg").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let report = collect(dir.path(), &LibrarySettings::default());
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.found[0].title, "song");
    }

    #[test]
    fn collect_applies_stem_heuristic() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("The Band - Hit Song.mp3"), b"noise").unwrap();

        let report = collect(dir.path(), &LibrarySettings::default());
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].title, "Hit Song");
        assert_eq!(report.found[0].artist.as_deref(), Some("The Band"));
    }

    #[test]
    fn collect_accepts_a_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("one.mp3");
        fs::write(&file, b"noise").unwrap();

        let report = collect(&file, &LibrarySettings::default());
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.found[0].source, file);
    }

    #[test]
    fn collect_single_non_audio_file_is_skipped() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("readme.txt");
        fs::write(&file, b"hello").unwrap();

        let report = collect(&file, &LibrarySettings::default());
        assert!(report.found.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn collect_skips_hidden_files_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"noise").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"noise").unwrap();

        let report = collect(dir.path(), &LibrarySettings::default());
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].title, "visible");
    }

    #[test]
    fn collect_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"noise").unwrap();
        let albums = dir.path().join("albums");
        fs::create_dir_all(&albums).unwrap();
        fs::write(albums.join("nested.mp3"), b"noise").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let report = collect(dir.path(), &settings);
        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].title, "root");
    }

    #[test]
    fn collect_respects_max_depth() {
        let dir = tempdir().unwrap();
        let outer = dir.path().join("outer");
        let inner = outer.join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(dir.path().join("root.mp3"), b"noise").unwrap();
        fs::write(outer.join("mid.mp3"), b"noise").unwrap();
        fs::write(inner.join("deep.mp3"), b"noise").unwrap();

        // walkdir's depth 0 is the root itself, so a cap of 2 admits the
        // root's files and outer/* while cutting off outer/inner/*.
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let report = collect(dir.path(), &settings);

        let titles: Vec<&str> = report.found.iter().map(|f| f.title.as_str()).collect();
        assert!(titles.contains(&"root"));
        assert!(titles.contains(&"mid"));
        assert!(!titles.contains(&"deep"));
    }

    #[test]
    fn collect_sorts_directory_results_case_insensitively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"noise").unwrap();
        fs::write(dir.path().join("A.ogg"), b"noise").unwrap();

        let report = collect(dir.path(), &LibrarySettings::default());
        assert_eq!(report.found.len(), 2);
        assert_eq!(report.found[0].title, "A");
        assert_eq!(report.found[1].title, "b");
    }
}
