#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use beatchat::{ChatProvider, CompletionRequest, CompletionResponse, ProviderError};
use musicdata::*;

/// Provider that replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<CompletionResponse, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<CompletionResponse, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))
    }
}

/// A backend call as observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub args: Vec<String>,
}

/// Backend returning canned data. Playlist calls go to a real [`Playlist`].
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Recorded>>,
    playlist: Playlist,
    fail_lookups: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup answers with an API error.
    pub fn failing() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, args: &[&dyn ToString]) {
        self.calls.lock().unwrap().push(Recorded {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
        });
    }

    fn lookup<T>(&self, value: T) -> Result<T, BackendError> {
        if self.fail_lookups {
            Err(BackendError::Api {
                code: 6,
                message: "Track not found".to_string(),
            })
        } else {
            Ok(value)
        }
    }
}

fn track(name: &str, artist: &str) -> TrackSummary {
    TrackSummary {
        name: name.to_string(),
        artist: artist.to_string(),
        listeners: Some(1_000),
        url: None,
    }
}

#[async_trait]
impl MusicBackend for RecordingBackend {
    async fn search_track(
        &self,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        self.record("search_track", &[&song_title, &limit]);
        self.lookup(vec![track(song_title, "The Beatles")])
    }

    async fn get_track_info(
        &self,
        artist: &str,
        song_title: &str,
    ) -> Result<TrackInfo, BackendError> {
        self.record("get_track_info", &[&artist, &song_title]);
        self.lookup(TrackInfo {
            name: song_title.to_string(),
            artist: artist.to_string(),
            album: Some("Help!".to_string()),
            duration_secs: Some(125),
            listeners: None,
            playcount: None,
            tags: vec!["60s".to_string()],
            summary: None,
            url: None,
        })
    }

    async fn get_related_tracks(
        &self,
        artist: &str,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<SimilarTrack>, BackendError> {
        self.record("get_related_tracks", &[&artist, &song_title, &limit]);
        self.lookup(vec![SimilarTrack {
            name: "Michelle".to_string(),
            artist: artist.to_string(),
            similarity: Some(0.9),
            url: None,
        }])
    }

    async fn get_album_info(
        &self,
        artist: &str,
        album_title: &str,
    ) -> Result<AlbumInfo, BackendError> {
        self.record("get_album_info", &[&artist, &album_title]);
        self.lookup(AlbumInfo {
            name: album_title.to_string(),
            artist: artist.to_string(),
            listeners: None,
            playcount: None,
            tracks: vec![],
            tags: vec![],
            summary: None,
            url: None,
        })
    }

    async fn search_album(
        &self,
        album_title: &str,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, BackendError> {
        self.record("search_album", &[&album_title, &limit]);
        self.lookup(vec![AlbumSummary {
            name: album_title.to_string(),
            artist: "The Beatles".to_string(),
            url: None,
        }])
    }

    async fn tag_top_tracks(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        self.record("tag_top_tracks", &[&tag, &limit]);
        self.lookup(vec![track("So What", "Miles Davis")])
    }

    async fn tag_top_artists(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSummary>, BackendError> {
        self.record("tag_top_artists", &[&tag, &limit]);
        self.lookup(vec![ArtistSummary {
            name: "Miles Davis".to_string(),
            rank: Some(1),
            url: None,
        }])
    }

    async fn add_to_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError> {
        self.record("add_to_playlist", &[&song_title, &artist]);
        Ok(self.playlist.add(song_title, artist).await)
    }

    async fn delete_from_playlist(
        &self,
        song_title: &str,
        artist: &str,
    ) -> Result<PlaylistUpdate, BackendError> {
        self.record("delete_from_playlist", &[&song_title, &artist]);
        Ok(self.playlist.remove(song_title, artist).await)
    }

    async fn print_playlist(&self) -> Result<Vec<PlaylistEntry>, BackendError> {
        self.record("print_playlist", &[]);
        Ok(self.playlist.entries().await)
    }
}
