//! Account identity and client-side credential checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in account as the app sees it. The access token stays inside
/// the sync worker and is never part of application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Credential problems caught before any network call.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// Check the shape of an email address: a non-empty local part, exactly one
/// `@`, and an interior dot in the domain.
pub fn validate_email(email: &str) -> Result<(), CredentialError> {
    let email = email.trim();
    if email.is_empty() || email.contains(char::is_whitespace) {
        return Err(CredentialError::InvalidEmail);
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CredentialError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() {
        return Err(CredentialError::InvalidEmail);
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(CredentialError::InvalidEmail);
    }
    Ok(())
}

/// Reject passwords below the minimum length. Counted in characters, not
/// bytes.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

/// Both checks, email first.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CredentialError> {
    validate_email(email)?;
    validate_password(password)
}
