//! Typed function calls.
//!
//! The model names a function and hands over a JSON argument string. Both are
//! untrusted: [`MusicCall::parse`] only accepts names from the catalog and
//! arguments that deserialize into that function's argument struct.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::DEFAULT_LIMIT;
use crate::error::TurnError;

fn resolve_limit(limit: Option<u32>) -> u32 {
    // zero is treated like an omitted limit
    limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT)
}

/// A specific track, identified by artist and title.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRef {
    pub artist: String,
    pub song_title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub song_title: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TrackQuery {
    pub fn effective_limit(&self) -> u32 {
        resolve_limit(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedQuery {
    pub artist: String,
    pub song_title: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl RelatedQuery {
    pub fn effective_limit(&self) -> u32 {
        resolve_limit(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    pub artist: String,
    pub album_title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumQuery {
    pub album_title: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl AlbumQuery {
    pub fn effective_limit(&self) -> u32 {
        resolve_limit(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagQuery {
    pub tag: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TagQuery {
    pub fn effective_limit(&self) -> u32 {
        resolve_limit(self.limit)
    }
}

/// One variant per catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MusicCall {
    SearchTrack(TrackQuery),
    GetTrackInfo(TrackRef),
    GetRelatedTracks(RelatedQuery),
    GetAlbumInfo(AlbumRef),
    SearchAlbum(AlbumQuery),
    TagTopTracks(TagQuery),
    TagTopArtists(TagQuery),
    AddToPlaylist(TrackRef),
    DeleteFromPlaylist(TrackRef),
    PrintPlaylist,
}

impl MusicCall {
    /// Validate a model-issued call against the catalog.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, TurnError> {
        // Some models send "" for functions without parameters
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };

        let call = match name {
            "searchTrack" => MusicCall::SearchTrack(args(name, arguments)?),
            "getTrackInfo" => MusicCall::GetTrackInfo(args(name, arguments)?),
            "getRelatedTracks" => MusicCall::GetRelatedTracks(args(name, arguments)?),
            "getAlbumInfo" => MusicCall::GetAlbumInfo(args(name, arguments)?),
            "searchAlbum" => MusicCall::SearchAlbum(args(name, arguments)?),
            "getTagsTopTracks" => MusicCall::TagTopTracks(args(name, arguments)?),
            "getTagsTopArtists" => MusicCall::TagTopArtists(args(name, arguments)?),
            "addToPlaylist" => MusicCall::AddToPlaylist(args(name, arguments)?),
            "deleteFromPlaylist" => MusicCall::DeleteFromPlaylist(args(name, arguments)?),
            "printPlaylist" => {
                // no parameters, but the payload must still be JSON
                args::<serde_json::Value>(name, arguments)?;
                MusicCall::PrintPlaylist
            }
            other => return Err(TurnError::UnknownFunction(other.to_string())),
        };

        Ok(call)
    }

    /// Catalog name of this call.
    pub fn name(&self) -> &'static str {
        match self {
            MusicCall::SearchTrack(_) => "searchTrack",
            MusicCall::GetTrackInfo(_) => "getTrackInfo",
            MusicCall::GetRelatedTracks(_) => "getRelatedTracks",
            MusicCall::GetAlbumInfo(_) => "getAlbumInfo",
            MusicCall::SearchAlbum(_) => "searchAlbum",
            MusicCall::TagTopTracks(_) => "getTagsTopTracks",
            MusicCall::TagTopArtists(_) => "getTagsTopArtists",
            MusicCall::AddToPlaylist(_) => "addToPlaylist",
            MusicCall::DeleteFromPlaylist(_) => "deleteFromPlaylist",
            MusicCall::PrintPlaylist => "printPlaylist",
        }
    }
}

fn args<T: DeserializeOwned>(function: &str, arguments: &str) -> Result<T, TurnError> {
    serde_json::from_str(arguments).map_err(|source| TurnError::MalformedArguments {
        function: function.to_string(),
        source,
    })
}
