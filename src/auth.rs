//! Account identity and credential validation.

mod session;

pub use session::*;

#[cfg(test)]
mod tests;
