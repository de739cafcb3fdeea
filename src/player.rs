//! Audio playback: a worker thread around a rodio sink plus the pure
//! state machine the runtime drives it with.

mod engine;
mod sink;
mod state;
mod types;

pub use engine::*;
pub use state::*;
pub use types::*;
