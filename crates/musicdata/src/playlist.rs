use tokio::sync::RwLock;

use crate::types::{PlaylistEntry, PlaylistUpdate};

/// In-memory playlist. Lives as long as the process; nothing is persisted.
#[derive(Default)]
pub struct Playlist {
    entries: RwLock<Vec<PlaylistEntry>>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track unless the same title/artist pair is already present.
    pub async fn add(&self, song_title: &str, artist: &str) -> PlaylistUpdate {
        let mut entries = self.entries.write().await;

        if entries.iter().any(|e| e.matches(song_title, artist)) {
            return PlaylistUpdate {
                message: format!("\"{song_title}\" by {artist} is already in the playlist."),
                changed: false,
                playlist: entries.clone(),
            };
        }

        let entry = PlaylistEntry::new(song_title, artist);
        let message = format!(
            "Added \"{}\" by {} to the playlist.",
            entry.song_title, entry.artist
        );
        entries.push(entry);
        tracing::info!(size = entries.len(), "playlist track added");

        PlaylistUpdate {
            message,
            changed: true,
            playlist: entries.clone(),
        }
    }

    /// Remove every entry matching the title/artist pair.
    pub async fn remove(&self, song_title: &str, artist: &str) -> PlaylistUpdate {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !e.matches(song_title, artist));
        let changed = entries.len() != before;

        let message = if changed {
            tracing::info!(size = entries.len(), "playlist track removed");
            format!("Removed \"{song_title}\" by {artist} from the playlist.")
        } else {
            format!("\"{song_title}\" by {artist} was not found in the playlist.")
        };

        PlaylistUpdate {
            message,
            changed,
            playlist: entries.clone(),
        }
    }

    /// Snapshot of the playlist in insertion order.
    pub async fn entries(&self) -> Vec<PlaylistEntry> {
        self.entries.read().await.clone()
    }
}
