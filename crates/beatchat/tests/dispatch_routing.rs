mod common;

use std::collections::HashSet;

use beatchat::{catalog, dispatch, MusicCall, TurnError};
use common::RecordingBackend;
use serde_json::json;

async fn route(backend: &RecordingBackend, name: &str, arguments: &str) -> serde_json::Value {
    let call = MusicCall::parse(name, arguments).unwrap();
    dispatch(backend, &call).await.unwrap()
}

#[tokio::test]
async fn test_each_function_reaches_its_own_method() {
    let backend = RecordingBackend::new();

    let cases = [
        (
            "searchTrack",
            json!({"songTitle": "Yesterday", "limit": 3}),
            "search_track",
            vec!["Yesterday", "3"],
        ),
        (
            "getTrackInfo",
            json!({"artist": "The Beatles", "songTitle": "Yesterday"}),
            "get_track_info",
            vec!["The Beatles", "Yesterday"],
        ),
        (
            "getRelatedTracks",
            json!({"artist": "The Beatles", "songTitle": "Yesterday", "limit": 2}),
            "get_related_tracks",
            vec!["The Beatles", "Yesterday", "2"],
        ),
        (
            "getAlbumInfo",
            json!({"artist": "The Beatles", "albumTitle": "Help!"}),
            "get_album_info",
            vec!["The Beatles", "Help!"],
        ),
        (
            "searchAlbum",
            json!({"albumTitle": "Help!"}),
            "search_album",
            vec!["Help!", "5"],
        ),
        (
            "getTagsTopTracks",
            json!({"tag": "jazz", "limit": 7}),
            "tag_top_tracks",
            vec!["jazz", "7"],
        ),
        (
            "getTagsTopArtists",
            json!({"tag": "jazz"}),
            "tag_top_artists",
            vec!["jazz", "5"],
        ),
        (
            "addToPlaylist",
            json!({"songTitle": "Blackbird", "artist": "The Beatles"}),
            "add_to_playlist",
            vec!["Blackbird", "The Beatles"],
        ),
        (
            "deleteFromPlaylist",
            json!({"songTitle": "Blackbird", "artist": "The Beatles"}),
            "delete_from_playlist",
            vec!["Blackbird", "The Beatles"],
        ),
        ("printPlaylist", json!({}), "print_playlist", vec![]),
    ];
    assert_eq!(cases.len(), catalog().len());

    for (name, args, _, _) in &cases {
        route(&backend, name, &args.to_string()).await;
    }

    let calls = backend.calls();
    assert_eq!(calls.len(), cases.len());
    for (call, (name, _, method, args)) in calls.iter().zip(&cases) {
        assert_eq!(call.method, *method, "{} routed wrong", name);
        assert_eq!(&call.args, args, "{} passed wrong arguments", name);
    }

    let methods: HashSet<_> = calls.iter().map(|c| c.method).collect();
    assert_eq!(methods.len(), catalog().len());
}

#[tokio::test]
async fn test_results_are_serialized_camel_case() {
    let backend = RecordingBackend::new();

    let added = route(
        &backend,
        "addToPlaylist",
        r#"{"songTitle":"Blackbird","artist":"The Beatles"}"#,
    )
    .await;
    assert_eq!(added["changed"], true);
    assert_eq!(added["playlist"][0]["songTitle"], "Blackbird");

    let info = route(
        &backend,
        "getTrackInfo",
        r#"{"artist":"The Beatles","songTitle":"Yesterday"}"#,
    )
    .await;
    assert_eq!(info["durationSecs"], 125);
    assert!(info.get("listeners").is_none());
}

#[tokio::test]
async fn test_deleting_missing_entry_is_not_an_error() {
    let backend = RecordingBackend::new();

    let removed = route(
        &backend,
        "deleteFromPlaylist",
        r#"{"songTitle":"Help!","artist":"The Beatles"}"#,
    )
    .await;
    assert_eq!(removed["changed"], false);
    assert!(removed["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_backend_failure_names_function() {
    let backend = RecordingBackend::failing();
    let call = MusicCall::parse("getTagsTopTracks", r#"{"tag":"jazz"}"#).unwrap();

    let err = dispatch(&backend, &call).await.unwrap_err();
    assert!(matches!(
        err,
        TurnError::Backend {
            function: "getTagsTopTracks",
            ..
        }
    ));
    assert!(err.to_string().contains("getTagsTopTracks"));
}
