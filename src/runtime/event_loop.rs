use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::{AccountField, App, AuthMode, DragTarget, NoticeLevel, Panel, StyleRow};
use crate::auth::validate_credentials;
use crate::config;
use crate::library::SongEntry;
use crate::player::{AudioEngine, EngineCmd, EngineEvent, PlaybackState, bar_fraction, seek_target};
use crate::store::{LocalStore, PlaylistDoc, PreferencesDoc, newer};
use crate::sync::{SyncCmd, SyncEvent, SyncWorker};
use crate::ui::{self, UiAreas};

/// Loop-carried state that outlives a single iteration.
pub struct EventLoopState {
    /// Bar rectangles from the last draw; mouse events are mapped against these.
    pub areas: UiAreas,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            areas: UiAreas::default(),
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, and events from the
/// engine and sync threads. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &AudioEngine,
    sync: Option<&SyncWorker>,
    store: &LocalStore,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        drain_engine_events(app, engine);
        if let Some(worker) = sync {
            drain_sync_events(app, engine, worker, store);
        }
        app.prune_notices(Instant::now());

        terminal.draw(|f| {
            state.areas = ui::draw(f, app, &settings.controls);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, engine, sync, store)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, engine, state),
                _ => {}
            }
        }
    }

    Ok(())
}

fn drain_engine_events(app: &mut App, engine: &AudioEngine) {
    while let Some(event) = engine.try_recv_event() {
        match event {
            EngineEvent::Started { generation, duration } => {
                if generation != app.player.generation {
                    continue;
                }
                app.player.track_duration = duration;
                // The decoder's length refines whatever the tags said; the
                // next snapshot save picks it up.
                if let (Some(index), Some(d)) = (app.player.current, duration) {
                    app.playlist.set_duration(index, d);
                }
            }
            EngineEvent::Finished { generation } => {
                if generation != app.player.generation {
                    continue;
                }
                if app.player.playback != PlaybackState::Stopped {
                    advance(app, engine, true);
                }
            }
            EngineEvent::Failed { generation, message } => {
                // Generation 0 is the engine reporting before any load.
                if generation != 0 && generation != app.player.generation {
                    continue;
                }
                app.player.stop();
                app.push_notice(format!("playback failed: {message}"), NoticeLevel::Error);
            }
        }
    }
}

fn drain_sync_events(app: &mut App, engine: &AudioEngine, worker: &SyncWorker, store: &LocalStore) {
    while let Some(event) = worker.try_recv_event() {
        match event {
            SyncEvent::SignedIn { user, preferences, playlist } => {
                app.account.busy = false;
                app.account.clear_password();
                app.push_notice(format!("signed in as {}", user.email), NoticeLevel::Info);
                app.user = Some(user);
                // Reconciliation runs only against a server copy that was
                // actually read; a failed fetch keeps local data as is.
                match preferences {
                    Ok(remote) => reconcile_preferences(app, worker, store, remote),
                    Err(e) => app.push_notice(
                        format!("remote style not loaded: {e}"),
                        NoticeLevel::Error,
                    ),
                }
                match playlist {
                    Ok(remote) => reconcile_playlist(app, engine, worker, store, remote),
                    Err(e) => app.push_notice(
                        format!("remote playlist not loaded: {e}"),
                        NoticeLevel::Error,
                    ),
                }
            }
            SyncEvent::SignedOut => {
                app.account.busy = false;
                if app.user.take().is_some() {
                    app.push_notice("signed out", NoticeLevel::Info);
                }
            }
            SyncEvent::AuthRejected(message) => {
                app.account.busy = false;
                app.account.clear_password();
                app.push_notice(message, NoticeLevel::Error);
            }
            SyncEvent::RemotePreferences(doc) => {
                app.adopt_prefs(doc.preferences);
                if let Err(e) = store.save_preferences(&doc) {
                    warn!(error = %e, "could not mirror remote preferences");
                }
                app.push_notice("style updated from another device", NoticeLevel::Info);
            }
            SyncEvent::SyncFailed(message) => {
                app.push_notice(message, NoticeLevel::Error);
            }
        }
    }
}

/// Newer copy wins; the loser is overwritten on whichever side held it.
fn reconcile_preferences(
    app: &mut App,
    worker: &SyncWorker,
    store: &LocalStore,
    remote: Option<PreferencesDoc>,
) {
    let local = match store.load_preferences() {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "local preferences unreadable");
            None
        }
    };

    match (local, remote) {
        (Some(local), Some(remote)) => {
            let (local_at, remote_at) = (local.updated_at, remote.updated_at);
            let winner = newer(local, remote);
            app.adopt_prefs(winner.preferences);
            if remote_at > local_at {
                if let Err(e) = store.save_preferences(&winner) {
                    warn!(error = %e, "could not save preferences");
                }
            } else if local_at > remote_at {
                let _ = worker.send(SyncCmd::PushPreferences(winner));
            }
        }
        (None, Some(remote)) => {
            app.adopt_prefs(remote.preferences);
            if let Err(e) = store.save_preferences(&remote) {
                warn!(error = %e, "could not save preferences");
            }
        }
        (Some(local), None) => {
            let _ = worker.send(SyncCmd::PushPreferences(local));
        }
        (None, None) => {}
    }
}

fn reconcile_playlist(
    app: &mut App,
    engine: &AudioEngine,
    worker: &SyncWorker,
    store: &LocalStore,
    remote: Option<PlaylistDoc>,
) {
    let local = match store.load_playlist() {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "local playlist unreadable");
            None
        }
    };

    match (local, remote) {
        (Some(local), Some(remote)) => {
            let (local_at, remote_at) = (local.updated_at, remote.updated_at);
            let winner = newer(local, remote);
            if remote_at > local_at {
                if let Err(e) = store.save_playlist(&winner) {
                    warn!(error = %e, "could not save playlist");
                }
                adopt_remote_playlist(app, engine, winner.songs);
            } else if local_at > remote_at {
                let _ = worker.send(SyncCmd::PushPlaylist(winner));
            }
        }
        (None, Some(remote)) => {
            if let Err(e) = store.save_playlist(&remote) {
                warn!(error = %e, "could not save playlist");
            }
            adopt_remote_playlist(app, engine, remote.songs);
        }
        (Some(local), None) => {
            let _ = worker.send(SyncCmd::PushPlaylist(local));
        }
        (None, None) => {}
    }
}

fn adopt_remote_playlist(app: &mut App, engine: &AudioEngine, songs: Vec<SongEntry>) {
    let _ = engine.send(EngineCmd::Stop);
    app.player.stop();
    app.playlist.restore(songs);
    app.set_selected(0);
    app.push_notice("playlist updated from your account", NoticeLevel::Info);
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &AudioEngine,
    sync: Option<&SyncWorker>,
    store: &LocalStore,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.panel == Panel::Library && app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => {
                app.exit_filter_mode();
                if app.has_tracks() && !app.visible_indices().is_empty() {
                    play_index(app, engine, app.selected);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    // The signed-out account form owns the keyboard so emails can be typed.
    if app.panel == Panel::Account && !app.signed_in() {
        handle_account_key(key, app, sync);
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Tab => app.panel = app.panel.next(),
        KeyCode::Char('j') | KeyCode::Down if app.panel == Panel::Library => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up if app.panel == Panel::Library => app.select_prev(),
        KeyCode::Char('j') | KeyCode::Down if app.panel == Panel::Style => {
            app.style_row = app.style_row.next();
        }
        KeyCode::Char('k') | KeyCode::Up if app.panel == Panel::Style => {
            app.style_row = app.style_row.prev();
        }
        KeyCode::Char('h') | KeyCode::Left if app.panel == Panel::Style => {
            app.adjust_style(false);
        }
        KeyCode::Char('l') | KeyCode::Right if app.panel == Panel::Style => {
            app.adjust_style(true);
        }
        KeyCode::Char('h') if app.panel == Panel::Library => advance(app, engine, false),
        KeyCode::Char('l') if app.panel == Panel::Library => advance(app, engine, true),
        KeyCode::Enter => match app.panel {
            Panel::Library => {
                if app.has_tracks() {
                    play_index(app, engine, app.selected);
                }
            }
            Panel::Style => apply_style_action(app, sync, store),
            Panel::Account => request_sign_out(app, sync),
        },
        KeyCode::Char(' ') => toggle_pause_or_start(app, engine),
        KeyCode::Char('L') => {
            scrub(app, engine, Duration::from_secs(settings.controls.scrub_seconds), true);
        }
        KeyCode::Char('H') => {
            scrub(app, engine, Duration::from_secs(settings.controls.scrub_seconds), false);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            change_volume(app, engine, settings.controls.volume_step);
        }
        KeyCode::Char('-') => change_volume(app, engine, -settings.controls.volume_step),
        KeyCode::Char('m') => {
            app.player.toggle_mute();
            let _ = engine.send(EngineCmd::SetVolume(app.player.effective_volume()));
        }
        KeyCode::Char('/') if app.panel == Panel::Library => app.enter_filter_mode(),
        KeyCode::Esc if app.panel == Panel::Library => app.clear_filter(),
        KeyCode::Char('J') if app.panel == Panel::Library => move_selected(app, sync, store, false),
        KeyCode::Char('K') if app.panel == Panel::Library => move_selected(app, sync, store, true),
        KeyCode::Char('x') if app.panel == Panel::Library => remove_selected(app, engine, sync, store),
        KeyCode::Char('c') if app.panel == Panel::Library => clear_playlist(app, engine, sync, store),
        _ => {}
    }

    Ok(false)
}

fn handle_account_key(key: KeyEvent, app: &mut App, sync: Option<&SyncWorker>) {
    match key.code {
        KeyCode::Tab => app.panel = app.panel.next(),
        KeyCode::Up => app.account.focus = app.account.focus.prev(),
        KeyCode::Down => app.account.focus = app.account.focus.next(),
        KeyCode::Left | KeyCode::Right if app.account.focus == AccountField::Action => {
            app.account.mode = app.account.mode.toggled();
        }
        KeyCode::Backspace => app.account.backspace(),
        KeyCode::Enter => submit_account_form(app, sync),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.account.type_char(c);
            }
        }
        _ => {}
    }
}

fn submit_account_form(app: &mut App, sync: Option<&SyncWorker>) {
    if app.account.busy {
        return;
    }
    let Some(worker) = sync else {
        app.push_notice("remote sync is disabled", NoticeLevel::Error);
        return;
    };

    let email = app.account.email.trim().to_string();
    let password = app.account.password.clone();
    if let Err(e) = validate_credentials(&email, &password) {
        app.push_notice(e.to_string(), NoticeLevel::Error);
        return;
    }

    app.account.busy = true;
    let cmd = match app.account.mode {
        AuthMode::SignIn => SyncCmd::SignIn { email, password },
        AuthMode::SignUp => SyncCmd::SignUp { email, password },
    };
    let _ = worker.send(cmd);
}

fn request_sign_out(app: &mut App, sync: Option<&SyncWorker>) {
    if !app.signed_in() || app.account.busy {
        return;
    }
    if let Some(worker) = sync {
        app.account.busy = true;
        let _ = worker.send(SyncCmd::SignOut);
    }
}

fn handle_mouse_event(mouse: MouseEvent, app: &mut App, engine: &AudioEngine, state: &EventLoopState) {
    let position = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.areas.progress_bar.contains(position) {
                app.drag = Some(DragTarget::Progress);
                apply_bar(app, engine, state, mouse.column);
            } else if state.areas.volume_bar.contains(position) {
                app.drag = Some(DragTarget::Volume);
                apply_bar(app, engine, state, mouse.column);
            }
        }
        // A drag stays on the bar it started on, even off the rect.
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.drag.is_some() {
                apply_bar(app, engine, state, mouse.column);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.drag = None,
        _ => {}
    }
}

fn apply_bar(app: &mut App, engine: &AudioEngine, state: &EventLoopState, column: u16) {
    match app.drag {
        Some(DragTarget::Progress) => {
            let bar = state.areas.progress_bar;
            let fraction = bar_fraction(column, bar.x, bar.width);
            if let Some(target) = seek_target(fraction, app.player.track_duration) {
                let _ = engine.send(EngineCmd::SeekTo(target));
                snap_elapsed(app, target);
            }
        }
        Some(DragTarget::Volume) => {
            let bar = state.areas.volume_bar;
            let fraction = bar_fraction(column, bar.x, bar.width);
            app.player.set_volume_fraction(fraction);
            let _ = engine.send(EngineCmd::SetVolume(app.player.effective_volume()));
        }
        None => {}
    }
}

fn play_index(app: &mut App, engine: &AudioEngine, index: usize) {
    load_index(app, engine, index, true);
}

fn load_index(app: &mut App, engine: &AudioEngine, index: usize, autoplay: bool) {
    let Some(track) = app.playlist.get(index) else {
        return;
    };
    let Some(path) = track.source.clone() else {
        // Entries restored from disk carry metadata only until re-ingested.
        app.player.stop();
        app.push_notice(
            format!("{} has no local file this session", track.display),
            NoticeLevel::Error,
        );
        return;
    };
    let generation = app.player.begin_load(index, autoplay);
    let _ = engine.send(EngineCmd::Load {
        generation,
        path,
        autoplay,
    });
}

/// Step to the neighboring track, wrapping at either end. The new track
/// starts only if one was already playing; a paused player stays paused on
/// the track it stepped to.
fn advance(app: &mut App, engine: &AudioEngine, forward: bool) {
    let len = app.playlist.len();
    let target = if forward {
        app.player.next_index(len)
    } else {
        app.player.prev_index(len)
    };
    let resume = app.player.playback == PlaybackState::Playing;
    match target {
        Some(index) => load_index(app, engine, index, resume),
        None => app.player.stop(),
    }
}

fn toggle_pause_or_start(app: &mut App, engine: &AudioEngine) {
    match app.player.playback {
        PlaybackState::Stopped => {
            if app.has_tracks() {
                play_index(app, engine, app.selected);
            }
        }
        PlaybackState::Playing | PlaybackState::Paused => {
            let _ = engine.send(EngineCmd::TogglePause);
            app.player.toggle_pause();
        }
    }
}

fn scrub(app: &mut App, engine: &AudioEngine, step: Duration, forward: bool) {
    if app.player.playback == PlaybackState::Stopped {
        return;
    }
    let mut elapsed = Duration::ZERO;
    if let Some(handle) = app.playback_handle.as_ref() {
        if let Ok(info) = handle.lock() {
            elapsed = info.elapsed;
        }
    }
    let target = if forward {
        let ahead = elapsed.saturating_add(step);
        match app.player.track_duration {
            Some(total) => ahead.min(total),
            None => ahead,
        }
    } else {
        elapsed.saturating_sub(step)
    };
    let _ = engine.send(EngineCmd::SeekTo(target));
    snap_elapsed(app, target);
}

/// Move the displayed clock immediately; the engine updates its copy when
/// the seek lands.
fn snap_elapsed(app: &App, target: Duration) {
    if let Some(handle) = app.playback_handle.as_ref() {
        if let Ok(mut info) = handle.lock() {
            info.elapsed = target;
        }
    }
}

fn change_volume(app: &mut App, engine: &AudioEngine, delta: f32) {
    app.player.step_volume(delta);
    let _ = engine.send(EngineCmd::SetVolume(app.player.effective_volume()));
}

fn remove_selected(app: &mut App, engine: &AudioEngine, sync: Option<&SyncWorker>, store: &LocalStore) {
    if !app.has_tracks() {
        return;
    }
    let index = app.selected;
    let was_current = app.player.current == Some(index);
    let Some(track) = app.playlist.remove(index) else {
        return;
    };
    if was_current {
        let _ = engine.send(EngineCmd::Stop);
    }
    app.player.note_removed(index);
    if index >= app.playlist.len() && !app.playlist.is_empty() {
        app.set_selected(app.playlist.len() - 1);
    } else {
        app.ensure_selected_visible();
    }
    persist_playlist(app, sync, store);
    app.push_notice(format!("removed {}", track.display), NoticeLevel::Info);
}

fn clear_playlist(app: &mut App, engine: &AudioEngine, sync: Option<&SyncWorker>, store: &LocalStore) {
    if !app.has_tracks() {
        return;
    }
    let _ = engine.send(EngineCmd::Stop);
    app.playlist.clear();
    app.player.note_cleared();
    app.clear_filter();
    app.set_selected(0);
    persist_playlist(app, sync, store);
    app.push_notice("playlist cleared", NoticeLevel::Info);
}

fn move_selected(app: &mut App, sync: Option<&SyncWorker>, store: &LocalStore, up: bool) {
    if !app.filter_query.is_empty() {
        // Reordering a filtered view is ambiguous; the full list is the order.
        app.push_notice("clear the filter to reorder", NoticeLevel::Info);
        return;
    }
    let index = app.selected;
    let moved = if up {
        app.playlist.move_up(index)
    } else {
        app.playlist.move_down(index)
    };
    if moved {
        let other = if up { index - 1 } else { index + 1 };
        app.player.note_swapped(index, other);
        app.set_selected(other);
        persist_playlist(app, sync, store);
    }
}

/// Every playlist mutation lands on disk, and on the server when signed in.
fn persist_playlist(app: &App, sync: Option<&SyncWorker>, store: &LocalStore) {
    let doc = PlaylistDoc::now(app.playlist.snapshot());
    if let Err(e) = store.save_playlist(&doc) {
        warn!(error = %e, "could not save playlist");
    }
    if app.signed_in() {
        if let Some(worker) = sync {
            let _ = worker.send(SyncCmd::PushPlaylist(doc));
        }
    }
}

fn apply_style_action(app: &mut App, sync: Option<&SyncWorker>, store: &LocalStore) {
    match app.style_row {
        StyleRow::Save => save_preferences(app, sync, store),
        StyleRow::Reset => {
            app.prefs.reset_to_default();
            save_preferences(app, sync, store);
        }
        _ => {
            app.adjust_style(true);
        }
    }
}

fn save_preferences(app: &mut App, sync: Option<&SyncWorker>, store: &LocalStore) {
    let doc = PreferencesDoc::now(app.prefs);
    if let Err(e) = store.save_preferences(&doc) {
        app.push_notice(format!("could not save style: {e}"), NoticeLevel::Error);
        return;
    }
    app.mark_prefs_saved();
    if app.signed_in() {
        if let Some(worker) = sync {
            let _ = worker.send(SyncCmd::PushPreferences(doc));
        }
    }
    app.push_notice("style saved", NoticeLevel::Info);
}
