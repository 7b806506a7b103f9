//! Configuration loading for Beat Buddy.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/beatbuddy/config.toml` (system)
//! 2. `~/.config/beatbuddy/config.toml` (user)
//! 3. `./beatbuddy.toml` (local override, replaced by `--config` when given)
//! 4. Environment variables (`OPENAI_API_KEY`, `LASTFM_API_KEY`, `BEATBUDDY_*`)
//!
//! Tables are merged key by key, so a local file that only sets
//! `[assistant] temperature` keeps everything else from the user file.
//!
//! # Example Config
//!
//! ```toml
//! [openai]
//! model = "gpt-4o-mini"
//!
//! [lastfm]
//! api_key = "0123456789abcdef"
//!
//! [assistant]
//! temperature = 0.7
//! max_tokens = 250
//! followup_max_tokens = 75
//!
//! [telemetry]
//! log_level = "beatchat=debug,info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{config_candidates, discover_config_files, expand_path, ConfigSources};
pub use sections::{
    AssistantConfig, LastFmConfig, OpenAiConfig, TelemetryConfig, DEFAULT_SYSTEM_PROMPT,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete Beat Buddy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BeatConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub lastfm: LastFmConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl BeatConfig {
    /// Load configuration and report which files and env vars contributed.
    ///
    /// `config_path` stands in for `./beatbuddy.toml` when it exists.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let files = loader::discover_config_files(config_path);
        let (mut config, mut sources) = loader::load_files(&files)?;
        loader::apply_env_overrides(&mut config, &mut sources);
        Ok((config, sources))
    }

    /// Render the effective configuration as TOML. API keys are redacted.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# Beat Buddy Configuration\n\n");

        output.push_str("[openai]\n");
        output.push_str(&format!("api_key = \"{}\"\n", redact(&self.openai.api_key)));
        output.push_str(&format!("base_url = \"{}\"\n", self.openai.base_url));
        output.push_str(&format!("model = \"{}\"\n", self.openai.model));

        output.push_str("\n[lastfm]\n");
        output.push_str(&format!("api_key = \"{}\"\n", redact(&self.lastfm.api_key)));
        output.push_str(&format!("base_url = \"{}\"\n", self.lastfm.base_url));

        output.push_str("\n[assistant]\n");
        output.push_str(&format!(
            "system_prompt = {:?}\n",
            self.assistant.system_prompt
        ));
        output.push_str(&format!("temperature = {}\n", self.assistant.temperature));
        output.push_str(&format!("max_tokens = {}\n", self.assistant.max_tokens));
        output.push_str(&format!(
            "followup_max_tokens = {}\n",
            self.assistant.followup_max_tokens
        ));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));

        output
    }
}

fn redact(key: &Option<String>) -> &'static str {
    match key {
        Some(k) if !k.is_empty() => "<set>",
        _ => "",
    }
}
