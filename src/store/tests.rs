use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use super::local::LocalStore;
use super::paths::{default_data_dir, resolve_data_dir};
use super::types::{PlaylistDoc, PreferencesDoc, StoreError, newer};
use crate::library::SongEntry;
use crate::prefs::{Preferences, Theme};
use crate::test_support::{EnvGuard, env_lock};

fn entry(id: u64, name: &str) -> SongEntry {
    SongEntry {
        id,
        name: name.to_string(),
        artist: None,
        duration_secs: Some(200),
    }
}

#[test]
fn preferences_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf());

    let mut prefs = Preferences::default();
    prefs.theme = Theme::Sunset;
    prefs.font_size = 18;
    let doc = PreferencesDoc::now(prefs);

    store.save_preferences(&doc).unwrap();
    let loaded = store.load_preferences().unwrap().unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn playlist_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf());

    let doc = PlaylistDoc::now(vec![entry(1, "one"), entry(2, "two")]);
    store.save_playlist(&doc).unwrap();

    let loaded = store.load_playlist().unwrap().unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn missing_documents_read_as_none() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf());
    assert!(store.load_preferences().unwrap().is_none());
    assert!(store.load_playlist().unwrap().is_none());
}

#[test]
fn malformed_documents_are_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("preferences.json"), "{ not json").unwrap();

    let store = LocalStore::new(dir.path().to_path_buf());
    match store.load_preferences() {
        Err(StoreError::Malformed { .. }) => {}
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn save_creates_the_data_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = LocalStore::new(nested.clone());

    store
        .save_preferences(&PreferencesDoc::now(Preferences::default()))
        .unwrap();
    assert!(nested.join("preferences.json").exists());
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = tempdir().unwrap();
    let store = LocalStore::new(dir.path().to_path_buf());
    store.save_playlist(&PlaylistDoc::now(vec![])).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["playlist.json".to_string()]);
}

#[test]
fn newer_picks_the_later_write_regardless_of_order() {
    let old = PlaylistDoc {
        songs: vec![entry(1, "old")],
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    };
    let new = PlaylistDoc {
        songs: vec![entry(2, "new")],
        updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap(),
    };

    assert_eq!(newer(old.clone(), new.clone()).songs[0].name, "new");
    assert_eq!(newer(new.clone(), old.clone()).songs[0].name, "new");
}

#[test]
fn newer_keeps_the_first_argument_on_ties() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let a = PlaylistDoc {
        songs: vec![entry(1, "a")],
        updated_at: at,
    };
    let b = PlaylistDoc {
        songs: vec![entry(2, "b")],
        updated_at: at,
    };
    assert_eq!(newer(a, b).songs[0].name, "a");
}

#[test]
fn resolve_data_dir_prefers_vivace_data_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_DATA_DIR", "/tmp/vivace-data");
    assert_eq!(
        resolve_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-data")
    );
}

#[test]
fn default_data_dir_prefers_xdg_data_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("VIVACE_DATA_DIR");
    let _g2 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data-home");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-data-home").join("vivace")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("share")
            .join("vivace")
    );
}
