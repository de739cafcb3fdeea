//! Persisted document shapes shared by the local files and the remote store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::library::SongEntry;
use crate::prefs::Preferences;

/// Errors from reading or writing the local document files.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("no usable data directory; set VIVACE_DATA_DIR or HOME")]
    NoDataDir,
}

/// The preference record plus the time it was last written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDoc {
    pub preferences: Preferences,
    pub updated_at: DateTime<Utc>,
}

impl PreferencesDoc {
    /// Wrap `preferences` with the current time as its write stamp.
    pub fn now(preferences: Preferences) -> Self {
        Self {
            preferences,
            updated_at: Utc::now(),
        }
    }
}

/// The playlist metadata snapshot plus the time it was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDoc {
    pub songs: Vec<SongEntry>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistDoc {
    /// Wrap `songs` with the current time as its write stamp.
    pub fn now(songs: Vec<SongEntry>) -> Self {
        Self {
            songs,
            updated_at: Utc::now(),
        }
    }
}

/// Anything carrying a last-written timestamp.
pub trait Stamped {
    fn updated_at(&self) -> DateTime<Utc>;
}

impl Stamped for PreferencesDoc {
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Stamped for PlaylistDoc {
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Last write wins: the copy with the newer timestamp. Ties keep the first
/// argument.
pub fn newer<T: Stamped>(a: T, b: T) -> T {
    if b.updated_at() > a.updated_at() { b } else { a }
}
