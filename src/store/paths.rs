//! Data directory resolution.

use std::{env, path::PathBuf};

/// Resolve the data directory from `VIVACE_DATA_DIR` or XDG defaults.
pub fn resolve_data_dir() -> Option<PathBuf> {
    if let Some(p) = env::var_os("VIVACE_DATA_DIR") {
        return Some(PathBuf::from(p));
    }
    default_data_dir()
}

/// Compute the default data directory under `$XDG_DATA_HOME/vivace` or
/// `~/.local/share/vivace` when `XDG_DATA_HOME` is not set.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };

    data_home.map(|d| d.join("vivace"))
}
