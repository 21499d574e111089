//! Model module - canonical playback data types
//!
//! - `track`: the playable `Track` record and catalog item normalization
//! - `playback`: transport state and the published session snapshot

mod playback;
mod track;

pub use playback::{SessionSnapshot, TransportState};
pub use track::{NotPlayable, NotPlayableReason, Track, normalize};
