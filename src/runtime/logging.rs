use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log to a file in the data directory; the terminal belongs to the UI.
/// `VIVACE_LOG` overrides the filter. Logging is best-effort: if the file
/// cannot be opened the app runs without it.
pub fn init(data_dir: &Path) {
    let _ = std::fs::create_dir_all(data_dir);
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("vivace.log"))
    else {
        return;
    };

    // lofty logs a warning per oddly tagged file, which swamps ingest runs.
    let filter = EnvFilter::try_from_env("VIVACE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,lofty=error"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
}
