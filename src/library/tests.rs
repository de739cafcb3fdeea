use std::path::PathBuf;
use std::time::Duration;

use super::ingest::FoundTrack;
use super::model::{Playlist, make_display};
use super::search::matching_indices;

fn found(title: &str, artist: Option<&str>) -> FoundTrack {
    FoundTrack {
        source: PathBuf::from(format!("/tmp/{title}.mp3")),
        title: title.to_string(),
        artist: artist.map(|s| s.to_string()),
        duration: Some(Duration::from_secs(180)),
    }
}

fn playlist_of(titles: &[&str]) -> Playlist {
    let mut pl = Playlist::new();
    for t in titles {
        pl.add(found(t, None));
    }
    pl
}

#[test]
fn make_display_prefers_artist_dash_title() {
    assert_eq!(make_display("Song", Some("Artist")), "Artist - Song");
    assert_eq!(make_display("Song", Some("  Artist  ")), "Artist - Song");
    assert_eq!(make_display("Song", None), "Song");
    assert_eq!(make_display("Song", Some("")), "Song");
    assert_eq!(make_display("Song", Some("   ")), "Song");
}

#[test]
fn add_assigns_strictly_increasing_ids() {
    let mut pl = Playlist::new();
    let a = pl.add(found("a", None));
    let b = pl.add(found("b", None));
    let c = pl.add(found("c", None));
    assert!(a < b);
    assert!(b < c);
}

#[test]
fn ids_stay_unique_across_clear() {
    let mut pl = Playlist::new();
    let a = pl.add(found("a", None));
    pl.clear();
    assert!(pl.is_empty());
    let b = pl.add(found("b", None));
    assert!(b > a);
}

#[test]
fn added_tracks_are_playable_and_displayed() {
    let mut pl = Playlist::new();
    pl.add(found("Song", Some("Artist")));
    let t = pl.get(0).unwrap();
    assert!(t.is_playable());
    assert_eq!(t.display, "Artist - Song");
    assert_eq!(t.duration, Some(Duration::from_secs(180)));
}

#[test]
fn set_duration_reports_changes_only() {
    let mut pl = playlist_of(&["a"]);
    assert!(pl.set_duration(0, Duration::from_secs(200)));
    assert_eq!(pl.get(0).unwrap().duration, Some(Duration::from_secs(200)));
    assert!(!pl.set_duration(0, Duration::from_secs(200)));
    assert!(!pl.set_duration(9, Duration::from_secs(10)));
}

#[test]
fn remove_returns_the_track_and_ignores_out_of_range() {
    let mut pl = playlist_of(&["a", "b", "c"]);
    let removed = pl.remove(1).unwrap();
    assert_eq!(removed.title, "b");
    assert_eq!(pl.len(), 2);
    assert!(pl.remove(5).is_none());
    assert_eq!(pl.len(), 2);
}

#[test]
fn move_up_and_down_swap_neighbors() {
    let mut pl = playlist_of(&["a", "b", "c"]);

    assert!(pl.move_up(1));
    let titles: Vec<&str> = pl.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "a", "c"]);

    assert!(pl.move_down(1));
    let titles: Vec<&str> = pl.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["b", "c", "a"]);
}

#[test]
fn move_at_the_edges_is_a_no_op() {
    let mut pl = playlist_of(&["a", "b"]);
    assert!(!pl.move_up(0));
    assert!(!pl.move_down(1));
    assert!(!pl.move_down(7));
    let titles: Vec<&str> = pl.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[test]
fn snapshot_restore_preserves_metadata_and_clears_sources() {
    let mut pl = Playlist::new();
    pl.add(found("One", Some("Ann")));
    pl.add(found("Two", None));

    let ids: Vec<u64> = pl.tracks().iter().map(|t| t.id).collect();
    let snap = pl.snapshot();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].name, "One");
    assert_eq!(snap[0].artist.as_deref(), Some("Ann"));
    assert_eq!(snap[0].duration_secs, Some(180));

    let mut restored = Playlist::new();
    restored.restore(snap);
    assert_eq!(restored.len(), 2);
    let restored_ids: Vec<u64> = restored.tracks().iter().map(|t| t.id).collect();
    assert_eq!(restored_ids, ids);
    assert_eq!(restored.get(0).unwrap().display, "Ann - One");
    assert!(!restored.get(0).unwrap().is_playable());
    assert!(!restored.get(1).unwrap().is_playable());
}

#[test]
fn adding_after_restore_does_not_reuse_ids() {
    let mut pl = Playlist::new();
    pl.add(found("a", None));
    let snap = pl.snapshot();
    let max_id = snap.iter().map(|e| e.id).max().unwrap();

    let mut restored = Playlist::new();
    restored.restore(snap);
    let new_id = restored.add(found("b", None));
    assert!(new_id > max_id);
}

#[test]
fn song_entry_round_trips_as_camel_case_json() {
    let pl = {
        let mut pl = Playlist::new();
        pl.add(found("Song", Some("Artist")));
        pl
    };
    let snap = pl.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"durationSecs\":180"));
    let back: Vec<super::model::SongEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn search_matches_title_and_artist_case_insensitively() {
    let mut pl = Playlist::new();
    pl.add(found("Blue Sky", Some("The Band")));
    pl.add(found("Red Sun", Some("Other")));
    pl.add(found("skyline", None));

    assert_eq!(matching_indices(pl.tracks(), "sky"), vec![0, 2]);
    assert_eq!(matching_indices(pl.tracks(), "SKY"), vec![0, 2]);
    assert_eq!(matching_indices(pl.tracks(), "band"), vec![0]);
    assert_eq!(matching_indices(pl.tracks(), "nothing"), Vec::<usize>::new());
}

#[test]
fn blank_query_matches_everything() {
    let pl = playlist_of(&["a", "b", "c"]);
    assert_eq!(matching_indices(pl.tracks(), ""), vec![0, 1, 2]);
    assert_eq!(matching_indices(pl.tracks(), "   "), vec![0, 1, 2]);
}

#[test]
fn search_leaves_order_untouched() {
    let pl = playlist_of(&["c", "a", "b"]);
    let before: Vec<&str> = pl.tracks().iter().map(|t| t.title.as_str()).collect();
    let _ = matching_indices(pl.tracks(), "a");
    let after: Vec<&str> = pl.tracks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(before, after);
}
