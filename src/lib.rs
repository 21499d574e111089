//! Preview playback client for a public music catalog
//!
//! - `catalog`: catalog API access (home feed, containers, search)
//! - `model`: canonical [`model::Track`] and the published session snapshot
//! - `audio`: the audio resource seam and a `rodio` implementation
//! - `session`: the single playback session shared by every screen
//! - `mini_player`: collapsed player bar logic
//! - `identity`: accounts, profiles and avatars
//! - `scan`: scan-to-play

pub mod audio;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod identity;
pub mod logging;
pub mod mini_player;
pub mod model;
pub mod scan;
pub mod session;
