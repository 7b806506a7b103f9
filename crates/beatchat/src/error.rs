use musicdata::BackendError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Everything that can abort a turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error("arguments for {function} are malformed: {source}")]
    MalformedArguments {
        function: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("function {0} is not implemented")]
    UnknownFunction(String),

    #[error("{function} failed: {source}")]
    Backend {
        function: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("could not encode {function} result: {source}")]
    EncodeResult {
        function: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The single failure a caller of [`crate::Conversation::send`] sees.
///
/// The underlying [`TurnError`] is kept for logging and tests but callers are
/// not expected to branch on it.
#[derive(Debug, Error)]
#[error("failed to communicate with the model provider")]
pub struct ChatError {
    #[source]
    reason: TurnError,
}

impl ChatError {
    pub fn reason(&self) -> &TurnError {
        &self.reason
    }

    pub fn into_reason(self) -> TurnError {
        self.reason
    }
}

impl From<TurnError> for ChatError {
    fn from(reason: TurnError) -> Self {
        Self { reason }
    }
}
