use std::env;
use std::path::PathBuf;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, NoticeLevel};
use crate::player::AudioEngine;
use crate::store::{LocalStore, StoreError, resolve_data_dir};
use crate::sync::SyncWorker;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let Some(data_dir) = resolve_data_dir() else {
        return Err(StoreError::NoDataDir.into());
    };
    logging::init(&data_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let store = LocalStore::new(data_dir);
    let (playlist, prefs) = startup::load_local_state(&store);

    let engine = AudioEngine::new();
    let mut app = App::new(playlist, prefs);
    app.set_playback_handle(engine.playback_handle());

    if let Some(arg) = env::args().nth(1) {
        startup::ingest_path(&mut app, &store, PathBuf::from(arg), &settings.library);
    }

    let sync = if settings.remote.enabled {
        match SyncWorker::new(&settings.remote) {
            Ok(worker) => Some(worker),
            Err(e) => {
                warn!(error = %e, "remote sync unavailable, running offline");
                app.push_notice(format!("sync unavailable: {e}"), NoticeLevel::Error);
                None
            }
        }
    } else {
        None
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &engine,
            sync.as_ref(),
            &store,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    engine.quit();
    if let Some(worker) = sync {
        worker.quit();
    }

    run_result
}
