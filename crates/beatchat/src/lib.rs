//! Function-calling conversation loop for Beat Buddy.
//!
//! A turn sends the history and the function catalog to the model. When the
//! model asks for a function, the call is validated into a [`MusicCall`],
//! run against a [`musicdata::MusicBackend`], and the result is fed back for
//! a short natural-language follow-up.

pub mod calls;
pub mod catalog;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod provider;
pub mod sanitize;
pub mod types;

pub use calls::{AlbumQuery, AlbumRef, MusicCall, RelatedQuery, TagQuery, TrackQuery, TrackRef};
pub use catalog::{catalog, find, FunctionDescriptor, DEFAULT_LIMIT};
pub use conversation::{Conversation, ConversationSettings};
pub use dispatch::dispatch;
pub use error::{ChatError, TurnError};
pub use provider::{
    ChatProvider, CompletionRequest, CompletionResponse, FunctionCallPolicy, OpenAiProvider,
    ProviderError,
};
pub use sanitize::sanitize;
pub use types::{FunctionCall, Message, Role};
