use crate::config;

/// Settings come from the optional config file plus environment overrides.
/// Any problem falls back to the compiled-in defaults; the player starts
/// either way, and stderr is still ours this early.
pub fn load_settings() -> config::Settings {
    let settings = match config::Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("vivace: config not loaded, using defaults: {e}");
            return config::Settings::default();
        }
    };
    if let Err(msg) = settings.validate() {
        eprintln!("vivace: config rejected, using defaults: {msg}");
        return config::Settings::default();
    }
    settings
}
