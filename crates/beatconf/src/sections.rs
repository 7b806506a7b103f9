//! Config sections. Each one maps to a `[table]` in the TOML file.

use serde::{Deserialize, Serialize};

/// Default instruction that opens every first-round request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Beat Buddy, a music recommender. \
Guide the user and make playlists based on their inputs and suggestions. \
Use the available functions to get music data when necessary.";

/// Chat-completion provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key. Usually supplied through `OPENAI_API_KEY` rather than a file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    /// Default: https://api.openai.com/v1
    #[serde(default = "OpenAiConfig::default_base_url")]
    pub base_url: String,

    /// Model used for both rounds of a turn.
    /// Default: gpt-4o-mini
    #[serde(default = "OpenAiConfig::default_model")]
    pub model: String,
}

impl OpenAiConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
            model: Self::default_model(),
        }
    }
}

/// Last.fm web service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastFmConfig {
    /// Last.fm API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// REST root.
    /// Default: https://ws.audioscrobbler.com/2.0/
    #[serde(default = "LastFmConfig::default_base_url")]
    pub base_url: String,
}

impl LastFmConfig {
    fn default_base_url() -> String {
        "https://ws.audioscrobbler.com/2.0/".to_string()
    }
}

impl Default for LastFmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
        }
    }
}

/// Generation settings for the conversation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "AssistantConfig::default_system_prompt")]
    pub system_prompt: String,

    /// Sampling temperature for both rounds.
    /// Default: 0.7
    #[serde(default = "AssistantConfig::default_temperature")]
    pub temperature: f32,

    /// Output cap for the first round (the one that may request a function).
    /// Default: 250
    #[serde(default = "AssistantConfig::default_max_tokens")]
    pub max_tokens: u32,

    /// Output cap for the follow-up round after a function result.
    /// Default: 75
    #[serde(default = "AssistantConfig::default_followup_max_tokens")]
    pub followup_max_tokens: u32,
}

impl AssistantConfig {
    fn default_system_prompt() -> String {
        DEFAULT_SYSTEM_PROMPT.to_string()
    }

    fn default_temperature() -> f32 {
        0.7
    }

    fn default_max_tokens() -> u32 {
        250
    }

    fn default_followup_max_tokens() -> u32 {
        75
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: Self::default_system_prompt(),
            temperature: Self::default_temperature(),
            max_tokens: Self::default_max_tokens(),
            followup_max_tokens: Self::default_followup_max_tokens(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target).
    /// Default: warn
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
