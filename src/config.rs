//! Settings schema and loading: the `[library]`, `[remote]` and
//! `[controls]` sections, layered from an optional TOML file and
//! `VIVACE__`-prefixed environment variables.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
