use async_trait::async_trait;

use crate::error::BackendError;
use crate::lastfm::LastFmClient;
use crate::playlist::Playlist;
use crate::types::*;

/// The music operations the assistant can invoke.
///
/// Lookups go to a metadata service; playlist operations mutate state owned
/// by the implementation. Arguments are plain values so that callers never
/// depend on a particular service's request format.
#[async_trait]
pub trait MusicBackend: Send + Sync {
    async fn search_track(
        &self,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError>;

    async fn get_track_info(
        &self,
        artist: &str,
        song_title: &str,
    ) -> Result<TrackInfo, BackendError>;

    async fn get_related_tracks(
        &self,
        artist: &str,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<SimilarTrack>, BackendError>;

    async fn get_album_info(
        &self,
        artist: &str,
        album_title: &str,
    ) -> Result<AlbumInfo, BackendError>;

    async fn search_album(
        &self,
        album_title: &str,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, BackendError>;

    async fn tag_top_tracks(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError>;

    async fn tag_top_artists(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSummary>, BackendError>;

    async fn add_to_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError>;

    async fn delete_from_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError>;

    async fn print_playlist(&self) -> Result<Vec<PlaylistEntry>, BackendError>;
}

/// Last.fm lookups plus a process-local playlist.
pub struct LastFmBackend {
    client: LastFmClient,
    playlist: Playlist,
}

impl LastFmBackend {
    pub fn new(client: LastFmClient) -> Self {
        Self {
            client,
            playlist: Playlist::new(),
        }
    }

    pub fn from_config(config: &beatconf::LastFmConfig) -> Result<Self, BackendError> {
        Ok(Self::new(LastFmClient::from_config(config)?))
    }
}

#[async_trait]
impl MusicBackend for LastFmBackend {
    async fn search_track(
        &self,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        self.client.search_track(song_title, limit).await
    }

    async fn get_track_info(
        &self,
        artist: &str,
        song_title: &str,
    ) -> Result<TrackInfo, BackendError> {
        self.client.track_info(artist, song_title).await
    }

    async fn get_related_tracks(
        &self,
        artist: &str,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<SimilarTrack>, BackendError> {
        self.client.similar_tracks(artist, song_title, limit).await
    }

    async fn get_album_info(
        &self,
        artist: &str,
        album_title: &str,
    ) -> Result<AlbumInfo, BackendError> {
        self.client.album_info(artist, album_title).await
    }

    async fn search_album(
        &self,
        album_title: &str,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, BackendError> {
        self.client.search_album(album_title, limit).await
    }

    async fn tag_top_tracks(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        self.client.tag_top_tracks(tag, limit).await
    }

    async fn tag_top_artists(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSummary>, BackendError> {
        self.client.tag_top_artists(tag, limit).await
    }

    async fn add_to_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError> {
        Ok(self.playlist.add(song_title, artist).await)
    }

    async fn delete_from_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError> {
        Ok(self.playlist.remove(song_title, artist).await)
    }

    async fn print_playlist(&self) -> Result<Vec<PlaylistEntry>, BackendError> {
        Ok(self.playlist.entries().await)
    }
}
