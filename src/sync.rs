//! Remote account and document sync: a blocking HTTP client plus the
//! worker thread that owns the session.

mod client;
mod types;
mod worker;

pub use client::{RemoteStore, Session};
pub use types::*;
pub use worker::*;

#[cfg(test)]
mod tests;
