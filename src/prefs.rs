//! Style customization: the preference record, its mutation steps and the
//! visual values the UI derives from it.
//!
//! Edits take effect on the next draw; persistence happens only on an
//! explicit save.

mod model;
mod theme;

pub use model::*;
pub use theme::*;
