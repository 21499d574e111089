//! Configuration loader and schema types
//!
//! Settings come from an optional TOML file, then `SPOTIFY_PREVIEW__*`
//! environment variables, then struct defaults.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
