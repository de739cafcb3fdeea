use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Load settings from the optional config file, then layer
    /// `VIVACE__SECTION__KEY` environment variables over it. A missing file
    /// leaves the struct defaults in place.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        builder
            .add_source(
                ::config::Environment::with_prefix("VIVACE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject value combinations the rest of the app cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.remote.enabled && self.remote.base_url.trim().is_empty() {
            return Err("remote.base_url must be set when remote.enabled is true".to_string());
        }
        if self.remote.poll_secs == 0 {
            return Err("remote.poll_secs must be >= 1".to_string());
        }
        if self.remote.timeout_secs == 0 {
            return Err("remote.timeout_secs must be >= 1".to_string());
        }
        if !(self.controls.volume_step > 0.0 && self.controls.volume_step <= 1.0) {
            return Err("controls.volume_step must be in (0, 1]".to_string());
        }
        Ok(())
    }
}

/// Config file location: `VIVACE_CONFIG_PATH` wins, XDG conventions
/// otherwise.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("VIVACE_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/vivace/config.toml`, falling back to
/// `~/.config/vivace/config.toml`. `None` without a home directory.
pub fn default_config_path() -> Option<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("vivace").join("config.toml"))
}
