use musicdata::{BackendError, MusicBackend};
use serde::Serialize;
use serde_json::Value;

use crate::calls::MusicCall;
use crate::error::TurnError;

/// Run a parsed call against the backend and return its result as JSON.
#[tracing::instrument(skip(backend, call), fields(function = call.name()))]
pub async fn dispatch(backend: &dyn MusicBackend, call: &MusicCall) -> Result<Value, TurnError> {
    let function = call.name();
    tracing::info!("dispatching function call");

    match call {
        MusicCall::SearchTrack(q) => encode(
            function,
            backend
                .search_track(&q.song_title, q.effective_limit())
                .await,
        ),
        MusicCall::GetTrackInfo(t) => encode(
            function,
            backend.get_track_info(&t.artist, &t.song_title).await,
        ),
        MusicCall::GetRelatedTracks(q) => encode(
            function,
            backend
                .get_related_tracks(&q.artist, &q.song_title, q.effective_limit())
                .await,
        ),
        MusicCall::GetAlbumInfo(a) => encode(
            function,
            backend.get_album_info(&a.artist, &a.album_title).await,
        ),
        MusicCall::SearchAlbum(q) => encode(
            function,
            backend
                .search_album(&q.album_title, q.effective_limit())
                .await,
        ),
        MusicCall::TagTopTracks(q) => encode(
            function,
            backend.tag_top_tracks(&q.tag, q.effective_limit()).await,
        ),
        MusicCall::TagTopArtists(q) => encode(
            function,
            backend.tag_top_artists(&q.tag, q.effective_limit()).await,
        ),
        MusicCall::AddToPlaylist(t) => encode(
            function,
            backend.add_to_playlist(&t.song_title, &t.artist).await,
        ),
        MusicCall::DeleteFromPlaylist(t) => encode(
            function,
            backend.delete_from_playlist(&t.song_title, &t.artist).await,
        ),
        MusicCall::PrintPlaylist => encode(function, backend.print_playlist().await),
    }
}

fn encode<T: Serialize>(
    function: &'static str,
    result: Result<T, BackendError>,
) -> Result<Value, TurnError> {
    let value = result.map_err(|source| TurnError::Backend { function, source })?;
    serde_json::to_value(value).map_err(|source| TurnError::EncodeResult { function, source })
}
