//! Client for the Last.fm 2.0 REST API.
//!
//! Last.fm's JSON is loose: counts arrive as strings or numbers, a list with
//! one element may arrive as a bare object, and empty tag lists can be `""`.
//! The raw response types below absorb that before anything leaves this module.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::BackendError;
use crate::types::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin Last.fm client. One instance is cheap to share behind an `Arc`.
pub struct LastFmClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl LastFmClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Build a client from the `[lastfm]` config section.
    pub fn from_config(config: &beatconf::LastFmConfig) -> Result<Self, BackendError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(BackendError::MissingApiKey)?;
        Self::new(&config.base_url, api_key)
    }

    pub async fn search_track(
        &self,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        let response: TrackSearchResponse = self
            .call(
                "track.search",
                &[
                    ("track", song_title.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .trackmatches
            .track
            .into_vec()
            .into_iter()
            .take(limit as usize)
            .map(RawTrack::into_summary)
            .collect())
    }

    pub async fn track_info(
        &self,
        artist: &str,
        song_title: &str,
    ) -> Result<TrackInfo, BackendError> {
        let response: TrackInfoResponse = self
            .call(
                "track.getInfo",
                &[
                    ("artist", artist.to_string()),
                    ("track", song_title.to_string()),
                    ("autocorrect", "1".to_string()),
                ],
            )
            .await?;

        let raw = response.track;
        Ok(TrackInfo {
            artist: artist_name(raw.artist, artist),
            name: raw.name,
            album: raw.album.and_then(|a| a.title),
            // track.getInfo reports milliseconds
            duration_secs: raw.duration.filter(|ms| *ms > 0).map(|ms| ms / 1000),
            listeners: raw.listeners,
            playcount: raw.playcount,
            tags: tag_names(raw.toptags.as_ref()),
            summary: wiki_summary(raw.wiki),
            url: raw.url,
        })
    }

    pub async fn similar_tracks(
        &self,
        artist: &str,
        song_title: &str,
        limit: u32,
    ) -> Result<Vec<SimilarTrack>, BackendError> {
        let response: SimilarTracksResponse = self
            .call(
                "track.getSimilar",
                &[
                    ("artist", artist.to_string()),
                    ("track", song_title.to_string()),
                    ("limit", limit.to_string()),
                    ("autocorrect", "1".to_string()),
                ],
            )
            .await?;

        Ok(response
            .similartracks
            .track
            .into_vec()
            .into_iter()
            .take(limit as usize)
            .map(|t| SimilarTrack {
                artist: artist_name(t.artist, ""),
                name: t.name,
                similarity: t.similarity,
                url: t.url,
            })
            .collect())
    }

    pub async fn album_info(
        &self,
        artist: &str,
        album_title: &str,
    ) -> Result<AlbumInfo, BackendError> {
        let response: AlbumInfoResponse = self
            .call(
                "album.getInfo",
                &[
                    ("artist", artist.to_string()),
                    ("album", album_title.to_string()),
                    ("autocorrect", "1".to_string()),
                ],
            )
            .await?;

        let raw = response.album;
        let tracks = raw
            .tracks
            .map(|t| t.track.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|t| AlbumTrack {
                rank: t.attr.and_then(|a| a.rank),
                name: t.name,
                duration_secs: t.duration,
            })
            .collect();

        Ok(AlbumInfo {
            name: raw.name,
            artist: artist_name(raw.artist, artist),
            listeners: raw.listeners,
            playcount: raw.playcount,
            tracks,
            tags: tag_names(raw.tags.as_ref()),
            summary: wiki_summary(raw.wiki),
            url: raw.url,
        })
    }

    pub async fn search_album(
        &self,
        album_title: &str,
        limit: u32,
    ) -> Result<Vec<AlbumSummary>, BackendError> {
        let response: AlbumSearchResponse = self
            .call(
                "album.search",
                &[
                    ("album", album_title.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .albummatches
            .album
            .into_vec()
            .into_iter()
            .take(limit as usize)
            .map(|a| AlbumSummary {
                name: a.name,
                artist: artist_name(a.artist, ""),
                url: a.url,
            })
            .collect())
    }

    pub async fn tag_top_tracks(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<TrackSummary>, BackendError> {
        let response: TagTopTracksResponse = self
            .call(
                "tag.getTopTracks",
                &[("tag", tag.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        Ok(response
            .tracks
            .track
            .into_vec()
            .into_iter()
            .take(limit as usize)
            .map(RawTrack::into_summary)
            .collect())
    }

    pub async fn tag_top_artists(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSummary>, BackendError> {
        let response: TagTopArtistsResponse = self
            .call(
                "tag.getTopArtists",
                &[("tag", tag.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        Ok(response
            .topartists
            .artist
            .into_vec()
            .into_iter()
            .take(limit as usize)
            .map(|a| ArtistSummary {
                name: a.name,
                rank: a.attr.and_then(|attr| attr.rank),
                url: a.url,
            })
            .collect())
    }

    /// Issue one API method call and decode its payload.
    #[tracing::instrument(skip(self, params), fields(lastfm.method = %method))]
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let mut query: Vec<(&str, String)> = vec![
            ("method", method.to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
        ];
        query.extend(params.iter().cloned());

        let request = self.client.get(&self.base_url).query(&query);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response");

        let decode_error = |source| BackendError::Decode {
            method: method.to_string(),
            source,
        };

        let value: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(_) if !status.is_success() => return Err(status_error(status, body)),
            Err(source) => return Err(decode_error(source)),
        };

        // Last.fm reports failures in the body, sometimes with HTTP 200
        if let Some(code) = value.get("error").and_then(Value::as_i64) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(BackendError::Api { code, message });
        }

        if !status.is_success() {
            return Err(status_error(status, body));
        }

        serde_json::from_value(value).map_err(decode_error)
    }
}

fn status_error(status: reqwest::StatusCode, body: String) -> BackendError {
    BackendError::Status {
        status: status.as_u16(),
        body,
    }
}

/// Artist name from either artist shape, or `fallback` when absent.
fn artist_name(artist: Option<RawArtist>, fallback: &str) -> String {
    match artist {
        Some(artist) => artist.into_name(),
        None => fallback.to_string(),
    }
}

fn wiki_summary(wiki: Option<RawWiki>) -> Option<String> {
    wiki.and_then(|w| w.summary).and_then(|s| clean_summary(&s))
}

/// Strip the trailing "Read more on Last.fm" anchor from a wiki summary.
fn clean_summary(summary: &str) -> Option<String> {
    let text = match summary.find("<a ") {
        Some(pos) => &summary[..pos],
        None => summary,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Pull tag names out of `{"tag": [...]}`, `{"tag": {...}}`, or `""`.
fn tag_names(tags: Option<&Value>) -> Vec<String> {
    match tags.and_then(|t| t.get("tag")) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|t| t.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        Some(single @ Value::Object(_)) => single
            .get("name")
            .and_then(Value::as_str)
            .map(|n| vec![n.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

// --- raw response shapes ---

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Artist is a bare string in search results and an object everywhere else.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArtist {
    Name(String),
    Object { name: String },
}

impl RawArtist {
    fn into_name(self) -> String {
        match self {
            RawArtist::Name(name) | RawArtist::Object { name } => name,
        }
    }
}

#[derive(Deserialize)]
struct RankAttr {
    #[serde(default, deserialize_with = "lenient_u64")]
    rank: Option<u64>,
}

#[derive(Deserialize)]
struct RawTrack {
    name: String,
    #[serde(default)]
    artist: Option<RawArtist>,
    #[serde(default, deserialize_with = "lenient_u64")]
    listeners: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(default, rename = "match", deserialize_with = "lenient_f64")]
    similarity: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "@attr")]
    attr: Option<RankAttr>,
}

impl RawTrack {
    fn into_summary(self) -> TrackSummary {
        TrackSummary {
            name: self.name,
            artist: artist_name(self.artist, ""),
            listeners: self.listeners,
            url: self.url,
        }
    }
}

#[derive(Deserialize)]
struct RawAlbumRef {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct RawWiki {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct RawTrackInfo {
    name: String,
    #[serde(default)]
    artist: Option<RawArtist>,
    #[serde(default)]
    album: Option<RawAlbumRef>,
    #[serde(default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    listeners: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    playcount: Option<u64>,
    #[serde(default)]
    toptags: Option<Value>,
    #[serde(default)]
    wiki: Option<RawWiki>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct TrackInfoResponse {
    track: RawTrackInfo,
}

#[derive(Deserialize, Default)]
struct TrackList {
    #[serde(default)]
    track: OneOrMany<RawTrack>,
}

#[derive(Deserialize)]
struct TrackSearchResults {
    #[serde(default)]
    trackmatches: TrackList,
}

#[derive(Deserialize)]
struct TrackSearchResponse {
    results: TrackSearchResults,
}

#[derive(Deserialize)]
struct SimilarTracksResponse {
    #[serde(default)]
    similartracks: TrackList,
}

#[derive(Deserialize)]
struct TagTopTracksResponse {
    #[serde(default)]
    tracks: TrackList,
}

#[derive(Deserialize)]
struct RawAlbum {
    name: String,
    #[serde(default)]
    artist: Option<RawArtist>,
    #[serde(default, deserialize_with = "lenient_u64")]
    listeners: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    playcount: Option<u64>,
    #[serde(default)]
    tracks: Option<TrackList>,
    #[serde(default)]
    tags: Option<Value>,
    #[serde(default)]
    wiki: Option<RawWiki>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct AlbumInfoResponse {
    album: RawAlbum,
}

#[derive(Deserialize, Default)]
struct AlbumList {
    #[serde(default)]
    album: OneOrMany<RawAlbum>,
}

#[derive(Deserialize)]
struct AlbumSearchResults {
    #[serde(default)]
    albummatches: AlbumList,
}

#[derive(Deserialize)]
struct AlbumSearchResponse {
    results: AlbumSearchResults,
}

#[derive(Deserialize)]
struct RawArtistEntry {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "@attr")]
    attr: Option<RankAttr>,
}

#[derive(Deserialize, Default)]
struct ArtistList {
    #[serde(default)]
    artist: OneOrMany<RawArtistEntry>,
}

#[derive(Deserialize)]
struct TagTopArtistsResponse {
    #[serde(default)]
    topartists: ArtistList,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Int(n)) => Some(n),
        Some(LooseNumber::Float(f)) if f >= 0.0 => Some(f as u64),
        Some(LooseNumber::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Int(n)) => Some(n as f64),
        Some(LooseNumber::Float(f)) => Some(f),
        Some(LooseNumber::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
