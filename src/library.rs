//! Playlist management: the track model, file/directory ingestion and
//! search filtering.
//!
//! The `Playlist` owns the ordered track list and id allocation; `collect`
//! finds playable files on disk and `matching_indices` builds the filtered
//! view the UI renders.

mod ingest;
mod model;
mod search;

pub use ingest::*;
pub use model::*;
pub use search::*;

#[cfg(test)]
mod tests;
