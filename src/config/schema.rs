use serde::Deserialize;

/// Application settings, read from `config.toml` and the environment.
///
/// Lookup order, strongest first: `VIVACE__SECTION__KEY` environment
/// variables (`__` separates nesting levels), then the config file at
/// `$XDG_CONFIG_HOME/vivace/config.toml` or `~/.config/vivace/config.toml`,
/// then these struct defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub remote: RemoteSettings,
    pub controls: ControlsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            remote: RemoteSettings::default(),
            controls: ControlsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to recurse into subdirectories when ingesting a directory.
    pub recursive: bool,
    /// Whether to follow symlinks while walking.
    pub follow_links: bool,
    /// Whether dotfiles and hidden directories are ingested.
    pub include_hidden: bool,
    /// Depth limit for the walk; `None` walks all the way down.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_links: true,
            include_hidden: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Whether the account/sync surface is active at all.
    /// When false no network thread is spawned and the account panel is inert.
    pub enabled: bool,
    /// Base URL of the document-store service, without a trailing slash.
    pub base_url: String,
    /// Seconds between polls of the remote preferences document while signed in.
    pub poll_secs: u64,
    /// Per-request timeout for remote calls (seconds).
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8080".to_string(),
            poll_secs: 10,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds jumped per scrub keypress.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press, as a fraction of full scale.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}
