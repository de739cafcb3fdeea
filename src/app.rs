//! The `App` aggregate: everything the UI thread mutates in response to
//! input, engine events and sync events. Holds the playlist, selection,
//! style preferences and account state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
