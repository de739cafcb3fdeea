//! Local persistence: the data directory, the two JSON document files and
//! the timestamped document shapes shared with the remote store.

mod local;
mod paths;
mod types;

pub use local::*;
pub use paths::*;
pub use types::*;

#[cfg(test)]
mod tests;
