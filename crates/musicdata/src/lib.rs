//! Music data for Beat Buddy: Last.fm lookups and a playlist.

pub mod backend;
pub mod error;
pub mod lastfm;
pub mod playlist;
pub mod types;

pub use backend::{LastFmBackend, MusicBackend};
pub use error::BackendError;
pub use lastfm::LastFmClient;
pub use playlist::Playlist;
pub use types::*;
