//! Protocol types shared between the runtime and the sync worker.

use thiserror::Error;

use crate::auth::AuthUser;
use crate::store::{PlaylistDoc, PreferencesDoc};

/// Errors from talking to the document-store service.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("not signed in")]
    AuthRequired,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("server unreachable: {0}")]
    Unreachable(String),
}

/// Commands the runtime sends to the sync worker.
#[derive(Debug)]
pub enum SyncCmd {
    SignUp { email: String, password: String },
    SignIn { email: String, password: String },
    SignOut,
    /// Push the latest saved preferences for the signed-in account.
    PushPreferences(PreferencesDoc),
    /// Push the latest playlist snapshot for the signed-in account.
    PushPlaylist(PlaylistDoc),
    Quit,
}

/// Events the sync worker reports back.
#[derive(Debug)]
pub enum SyncEvent {
    /// Sign-in or sign-up succeeded; carries whatever documents the account
    /// already has on the server. A failed fetch stays an `Err` so the
    /// runtime can tell "no document yet" from "could not look".
    SignedIn {
        user: AuthUser,
        preferences: Result<Option<PreferencesDoc>, RemoteError>,
        playlist: Result<Option<PlaylistDoc>, RemoteError>,
    },
    SignedOut,
    /// Sign-in or sign-up was rejected.
    AuthRejected(String),
    /// The polled remote preferences document changed under us.
    RemotePreferences(PreferencesDoc),
    /// A push or poll failed; the message is already user-presentable.
    SyncFailed(String),
}
