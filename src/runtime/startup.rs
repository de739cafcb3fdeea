use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::{App, NoticeLevel};
use crate::config::LibrarySettings;
use crate::library::{Playlist, collect};
use crate::prefs::Preferences;
use crate::store::{LocalStore, PlaylistDoc};

/// Restore the playlist and style preferences saved by previous sessions.
pub fn load_local_state(store: &LocalStore) -> (Playlist, Preferences) {
    let prefs = match store.load_preferences() {
        Ok(Some(doc)) => doc.preferences.clamped(),
        Ok(None) => Preferences::default(),
        Err(e) => {
            warn!(error = %e, "saved preferences unreadable, using defaults");
            Preferences::default()
        }
    };

    let mut playlist = Playlist::new();
    match store.load_playlist() {
        Ok(Some(doc)) => playlist.restore(doc.songs),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "saved playlist unreadable, starting empty"),
    }

    (playlist, prefs)
}

/// Ingest a directory or file named on the command line into the playlist.
pub fn ingest_path(app: &mut App, store: &LocalStore, path: PathBuf, settings: &LibrarySettings) {
    let report = collect(&path, settings);
    let added = app.playlist.extend(report.found);
    if added > 0 {
        if let Err(e) = store.save_playlist(&PlaylistDoc::now(app.playlist.snapshot())) {
            warn!(error = %e, "could not save playlist");
        }
        info!(added, skipped = report.skipped, path = %path.display(), "startup ingest");
        if report.skipped > 0 {
            app.push_notice(
                format!("added {added} tracks ({} non-audio files skipped)", report.skipped),
                NoticeLevel::Info,
            );
        } else {
            app.push_notice(format!("added {added} tracks"), NoticeLevel::Info);
        }
    } else {
        app.push_notice(
            format!("no audio files found under {}", path.display()),
            NoticeLevel::Error,
        );
    }
    app.ensure_selected_visible();
}
