//! Blocking HTTP client for the auth + document-store service.
//!
//! The service keeps one preferences document and one playlist document
//! per account under `/api/users/{uid}/...`, and issues bearer tokens from
//! `/api/auth/...`. All calls run on the sync worker thread, so blocking
//! requests are fine here.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::types::RemoteError;
use crate::auth::AuthUser;
use crate::store::{PlaylistDoc, PreferencesDoc};

/// Which per-user document an operation addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum DocKind {
    Preferences,
    Playlist,
}

impl DocKind {
    fn as_str(self) -> &'static str {
        match self {
            DocKind::Preferences => "preferences",
            DocKind::Playlist => "playlist",
        }
    }
}

pub(super) fn doc_url(base_url: &str, uid: &str, kind: DocKind) -> String {
    format!("{}/api/users/{}/{}", base_url, uid, kind.as_str())
}

#[derive(Serialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
    uid: String,
    email: String,
}

/// A bearer token plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

impl From<SessionResponse> for Session {
    fn from(r: SessionResponse) -> Self {
        Self {
            token: r.token,
            user: AuthUser {
                uid: r.uid,
                email: r.email,
            },
        }
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    if e.is_connect() || e.is_timeout() {
        RemoteError::Unreachable(e.to_string())
    } else {
        RemoteError::Request(e)
    }
}

pub struct RemoteStore {
    http: Client,
    base_url: String,
}

impl RemoteStore {
    /// Build a client against `base_url`. The URL must carry an `http://` or
    /// `https://` scheme; a trailing slash is stripped.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        if base_url.is_empty() {
            return Err(RemoteError::InvalidUrl("url cannot be empty".into()));
        }
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RemoteError::InvalidUrl(
                "url must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("vivace/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteError::Request)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an account and sign in as it.
    pub fn sign_up(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let url = format!("{}/api/auth/signup", self.base_url);
        debug!(url = %url, email = %email, "attempting sign-up");

        let request = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let session: SessionResponse = response
                .json()
                .map_err(|e| RemoteError::Parse(format!("bad sign-up response: {e}")))?;
            info!(uid = %session.uid, "account created");
            Ok(session.into())
        } else if status.as_u16() == 409 {
            warn!(email = %email, "sign-up rejected: email taken");
            Err(RemoteError::AuthFailed(
                "an account with that email already exists".to_string(),
            ))
        } else {
            let message = response.text().unwrap_or_default();
            Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Sign in to an existing account.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!(url = %url, email = %email, "attempting sign-in");

        let request = CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let session: SessionResponse = response
                .json()
                .map_err(|e| RemoteError::Parse(format!("bad sign-in response: {e}")))?;
            info!(uid = %session.uid, "signed in");
            Ok(session.into())
        } else if status.as_u16() == 401 {
            warn!(email = %email, "sign-in rejected");
            Err(RemoteError::AuthFailed(
                "invalid email or password".to_string(),
            ))
        } else {
            let message = response.text().unwrap_or_default();
            Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Invalidate a token server-side. Local sign-out proceeds even when
    /// this fails, so the caller only logs errors.
    pub fn sign_out(&self, token: &str) -> Result<(), RemoteError> {
        let url = format!("{}/api/auth/logout", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            info!("signed out");
            Ok(())
        } else {
            let message = response.text().unwrap_or_default();
            Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub fn fetch_preferences(
        &self,
        token: &str,
        uid: &str,
    ) -> Result<Option<PreferencesDoc>, RemoteError> {
        self.fetch_doc(token, uid, DocKind::Preferences)
    }

    pub fn put_preferences(
        &self,
        token: &str,
        uid: &str,
        doc: &PreferencesDoc,
    ) -> Result<(), RemoteError> {
        self.put_doc(token, uid, DocKind::Preferences, doc)
    }

    pub fn fetch_playlist(
        &self,
        token: &str,
        uid: &str,
    ) -> Result<Option<PlaylistDoc>, RemoteError> {
        self.fetch_doc(token, uid, DocKind::Playlist)
    }

    pub fn put_playlist(
        &self,
        token: &str,
        uid: &str,
        doc: &PlaylistDoc,
    ) -> Result<(), RemoteError> {
        self.put_doc(token, uid, DocKind::Playlist, doc)
    }

    /// GET a per-user document. A missing document is `Ok(None)`, not an
    /// error; an account that has never saved simply has none.
    fn fetch_doc<T: DeserializeOwned>(
        &self,
        token: &str,
        uid: &str,
        kind: DocKind,
    ) -> Result<Option<T>, RemoteError> {
        let url = doc_url(&self.base_url, uid, kind);
        debug!(url = %url, "fetching document");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let doc: T = response
                .json()
                .map_err(|e| RemoteError::Parse(format!("bad document: {e}")))?;
            Ok(Some(doc))
        } else if status.as_u16() == 404 {
            Ok(None)
        } else if status.as_u16() == 401 {
            Err(RemoteError::AuthRequired)
        } else {
            let message = response.text().unwrap_or_default();
            Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn put_doc<T: Serialize>(
        &self,
        token: &str,
        uid: &str,
        kind: DocKind,
        doc: &T,
    ) -> Result<(), RemoteError> {
        let url = doc_url(&self.base_url, uid, kind);
        debug!(url = %url, "putting document");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(doc)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 401 {
            Err(RemoteError::AuthRequired)
        } else {
            let message = response.text().unwrap_or_default();
            Err(RemoteError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
