//! The sync worker thread and its owning handle.
//!
//! The worker owns the session token; the rest of the app only ever sees
//! `AuthUser`. Commands come in over a channel, results and remote edits
//! go back as events the runtime drains each frame.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::client::{RemoteStore, Session};
use super::types::{RemoteError, SyncCmd, SyncEvent};
use crate::config::RemoteSettings;

pub struct SyncWorker {
    tx: Sender<SyncCmd>,
    events: Receiver<SyncEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SyncWorker {
    /// Build the client and spawn the worker. Fails fast on an unusable
    /// base URL so the runtime can drop to offline mode.
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        let client = RemoteStore::new(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )?;
        let poll_every = Duration::from_secs(settings.poll_secs);

        let (tx, rx) = mpsc::channel::<SyncCmd>();
        let (event_tx, events) = mpsc::channel::<SyncEvent>();
        let handle = spawn_worker_thread(client, poll_every, rx, event_tx);

        Ok(Self {
            tx,
            events,
            join: Mutex::new(Some(handle)),
        })
    }

    pub fn send(&self, cmd: SyncCmd) -> Result<(), mpsc::SendError<SyncCmd>> {
        self.tx.send(cmd)
    }

    /// One pending worker event, if any.
    pub fn try_recv_event(&self) -> Option<SyncEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the thread to stop and wait for it.
    pub fn quit(&self) {
        let _ = self.send(SyncCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn spawn_worker_thread(
    client: RemoteStore,
    poll_every: Duration,
    rx: Receiver<SyncCmd>,
    events: Sender<SyncEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut session: Option<Session> = None;
        // Stamp of the newest preferences document seen or written, so our
        // own pushes do not come back as remote edits.
        let mut seen_prefs: Option<DateTime<Utc>> = None;
        let mut last_poll = Instant::now();

        fn complete_sign_in(
            client: &RemoteStore,
            events: &Sender<SyncEvent>,
            new_session: Session,
            session: &mut Option<Session>,
            seen_prefs: &mut Option<DateTime<Utc>>,
        ) {
            let token = &new_session.token;
            let uid = &new_session.user.uid;

            let preferences = client.fetch_preferences(token, uid);
            if let Err(e) = &preferences {
                warn!(error = %e, "could not fetch remote preferences");
            }
            let playlist = client.fetch_playlist(token, uid);
            if let Err(e) = &playlist {
                warn!(error = %e, "could not fetch remote playlist");
            }

            // An unread document stays unseen; the next poll re-syncs it.
            *seen_prefs = match &preferences {
                Ok(Some(doc)) => Some(doc.updated_at),
                _ => None,
            };
            let user = new_session.user.clone();
            *session = Some(new_session);
            let _ = events.send(SyncEvent::SignedIn {
                user,
                preferences,
                playlist,
            });
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(500)) {
                Ok(SyncCmd::SignUp { email, password }) => {
                    match client.sign_up(&email, &password) {
                        Ok(s) => {
                            complete_sign_in(&client, &events, s, &mut session, &mut seen_prefs)
                        }
                        Err(e) => {
                            let _ = events.send(SyncEvent::AuthRejected(e.to_string()));
                        }
                    }
                }

                Ok(SyncCmd::SignIn { email, password }) => {
                    match client.sign_in(&email, &password) {
                        Ok(s) => {
                            complete_sign_in(&client, &events, s, &mut session, &mut seen_prefs)
                        }
                        Err(e) => {
                            let _ = events.send(SyncEvent::AuthRejected(e.to_string()));
                        }
                    }
                }

                Ok(SyncCmd::SignOut) => {
                    if let Some(s) = session.take() {
                        if let Err(e) = client.sign_out(&s.token) {
                            warn!(error = %e, "server-side sign-out failed");
                        }
                    }
                    seen_prefs = None;
                    let _ = events.send(SyncEvent::SignedOut);
                }

                Ok(SyncCmd::PushPreferences(doc)) => {
                    if let Some(s) = session.as_ref() {
                        match client.put_preferences(&s.token, &s.user.uid, &doc) {
                            Ok(()) => {
                                seen_prefs = Some(doc.updated_at);
                                debug!("preferences pushed");
                            }
                            Err(e) => {
                                let _ = events.send(SyncEvent::SyncFailed(format!(
                                    "preferences not saved to server: {e}"
                                )));
                            }
                        }
                    } else {
                        debug!("dropping preferences push, not signed in");
                    }
                }

                Ok(SyncCmd::PushPlaylist(doc)) => {
                    if let Some(s) = session.as_ref() {
                        if let Err(e) = client.put_playlist(&s.token, &s.user.uid, &doc) {
                            let _ = events.send(SyncEvent::SyncFailed(format!(
                                "playlist not saved to server: {e}"
                            )));
                        } else {
                            debug!("playlist pushed");
                        }
                    } else {
                        debug!("dropping playlist push, not signed in");
                    }
                }

                Ok(SyncCmd::Quit) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Watch the preferences document for edits from other devices.
            if let Some(s) = session.as_ref() {
                if last_poll.elapsed() >= poll_every {
                    last_poll = Instant::now();
                    match client.fetch_preferences(&s.token, &s.user.uid) {
                        Ok(Some(doc)) => {
                            let is_new =
                                seen_prefs.map(|seen| doc.updated_at > seen).unwrap_or(true);
                            if is_new {
                                seen_prefs = Some(doc.updated_at);
                                let _ = events.send(SyncEvent::RemotePreferences(doc));
                            }
                        }
                        Ok(None) => {}
                        Err(RemoteError::AuthRequired) => {
                            warn!("token expired, dropping session");
                            session = None;
                            seen_prefs = None;
                            let _ = events.send(SyncEvent::SignedOut);
                        }
                        Err(e) => debug!(error = %e, "preferences poll failed"),
                    }
                }
            }
        }
    })
}
