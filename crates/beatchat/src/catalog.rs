//! The functions advertised to the model.
//!
//! Schemas are written by hand so the wire shape is exactly what the model
//! sees: camelCase parameter names, explicit `default` on result limits, and
//! a `required` list per function.

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{json, Value};

/// Result count used when the model omits `limit`.
pub const DEFAULT_LIMIT: u32 = 5;

/// One callable operation as described to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl FunctionDescriptor {
    fn new(name: &'static str, description: &'static str, parameters: Value) -> Self {
        Self {
            name,
            description,
            parameters,
        }
    }

    /// Names listed under `required`.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Names of all declared parameters.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Declared default for a parameter, if any.
    pub fn default_for(&self, parameter: &str) -> Option<&Value> {
        self.parameters
            .get("properties")
            .and_then(|p| p.get(parameter))
            .and_then(|p| p.get("default"))
    }
}

/// The fixed, ordered catalog. Built on first use and never mutated.
pub fn catalog() -> &'static [FunctionDescriptor] {
    static CATALOG: OnceLock<Vec<FunctionDescriptor>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Look up a descriptor by function name.
pub fn find(name: &str) -> Option<&'static FunctionDescriptor> {
    catalog().iter().find(|f| f.name == name)
}

fn text(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn limit(noun: &str) -> Value {
    json!({
        "type": "integer",
        "description": format!("The number of {} to return (default is {}).", noun, DEFAULT_LIMIT),
        "default": DEFAULT_LIMIT
    })
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn build_catalog() -> Vec<FunctionDescriptor> {
    vec![
        FunctionDescriptor::new(
            "searchTrack",
            "Searches for tracks based on a song title.",
            object(
                json!({
                    "songTitle": text("The title of the song to search for."),
                    "limit": limit("tracks")
                }),
                &["songTitle"],
            ),
        ),
        FunctionDescriptor::new(
            "getTrackInfo",
            "Retrieves detailed information about a specific track.",
            object(
                json!({
                    "artist": text("The name of the artist."),
                    "songTitle": text("The title of the song.")
                }),
                &["artist", "songTitle"],
            ),
        ),
        FunctionDescriptor::new(
            "getRelatedTracks",
            "Searches for tracks similar to a given track.",
            object(
                json!({
                    "artist": text("The name of the artist."),
                    "songTitle": text("The title of the song to find similar tracks for."),
                    "limit": limit("tracks")
                }),
                &["artist", "songTitle"],
            ),
        ),
        FunctionDescriptor::new(
            "getAlbumInfo",
            "Retrieves information about a particular album by an artist.",
            object(
                json!({
                    "artist": text("The artist of the album."),
                    "albumTitle": text("The title of the album.")
                }),
                &["artist", "albumTitle"],
            ),
        ),
        FunctionDescriptor::new(
            "searchAlbum",
            "Searches for albums matching the title provided.",
            object(
                json!({
                    "albumTitle": text("The title of the album."),
                    "limit": limit("albums")
                }),
                &["albumTitle"],
            ),
        ),
        FunctionDescriptor::new(
            "getTagsTopTracks",
            "Finds the top tracks for a particular mood, genre or tag.",
            object(
                json!({
                    "tag": text("The tag related to a track."),
                    "limit": limit("tracks")
                }),
                &["tag"],
            ),
        ),
        FunctionDescriptor::new(
            "getTagsTopArtists",
            "Finds the top artists for a particular mood, genre or tag.",
            object(
                json!({
                    "tag": text("The tag related to an artist."),
                    "limit": limit("artists")
                }),
                &["tag"],
            ),
        ),
        FunctionDescriptor::new(
            "addToPlaylist",
            "Adds a particular track to the playlist.",
            object(
                json!({
                    "songTitle": text("The title of the song."),
                    "artist": text("The name of the artist.")
                }),
                &["songTitle", "artist"],
            ),
        ),
        FunctionDescriptor::new(
            "deleteFromPlaylist",
            "Deletes a particular track from the playlist.",
            object(
                json!({
                    "songTitle": text("The title of the song to remove."),
                    "artist": text("The name of the artist to remove.")
                }),
                &["songTitle", "artist"],
            ),
        ),
        FunctionDescriptor::new(
            "printPlaylist",
            "Prints ONLY the song title and the artist of each track in the playlist.",
            object(json!({}), &[]),
        ),
    ]
}
