use thiserror::Error;

/// Failures from a music backend operation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no Last.fm API key configured (set LASTFM_API_KEY or [lastfm] api_key)")]
    MissingApiKey,

    #[error("Last.fm request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Last.fm error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Last.fm returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}
