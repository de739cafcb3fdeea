//! Local JSON document files.
//!
//! Two flat documents live under the data directory: `preferences.json` and
//! `playlist.json`. A missing file reads as `None`; malformed JSON is an
//! error for the caller to surface.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{PlaylistDoc, PreferencesDoc, StoreError};

const PREFERENCES_FILE: &str = "preferences.json";
const PLAYLIST_FILE: &str = "playlist.json";

/// Reads and writes the document files under one data directory.
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_preferences(&self) -> Result<Option<PreferencesDoc>, StoreError> {
        self.read_doc(PREFERENCES_FILE)
    }

    pub fn save_preferences(&self, doc: &PreferencesDoc) -> Result<(), StoreError> {
        debug!(dir = %self.dir.display(), "saving preferences document");
        self.write_doc(PREFERENCES_FILE, doc)
    }

    pub fn load_playlist(&self) -> Result<Option<PlaylistDoc>, StoreError> {
        self.read_doc(PLAYLIST_FILE)
    }

    pub fn save_playlist(&self, doc: &PlaylistDoc) -> Result<(), StoreError> {
        debug!(dir = %self.dir.display(), songs = doc.songs.len(), "saving playlist document");
        self.write_doc(PLAYLIST_FILE, doc)
    }

    fn read_doc<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read { path, source: e }),
        };
        let doc = serde_json::from_str(&content)
            .map_err(|e| StoreError::Malformed { path, source: e })?;
        Ok(Some(doc))
    }

    fn write_doc<T: Serialize>(&self, name: &str, doc: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Write {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.dir.join(name);
        let content = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Malformed {
            path: path.clone(),
            source: e,
        })?;

        // Write to a sibling temp file, then rename into place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Write { path, source: e })?;
        Ok(())
    }
}
