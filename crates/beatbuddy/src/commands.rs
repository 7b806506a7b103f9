//! Subcommand implementations.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use beatchat::{Conversation, ConversationSettings, OpenAiProvider};
use beatconf::{BeatConfig, ConfigSources};
use musicdata::LastFmBackend;
use owo_colors::OwoColorize;

/// Wire the OpenAI provider and the Last.fm backend from config.
pub fn build_conversation(config: &BeatConfig) -> Result<Conversation> {
    let provider = OpenAiProvider::from_config(&config.openai)
        .context("OpenAI is not configured")?;
    let backend = LastFmBackend::from_config(&config.lastfm)
        .context("Last.fm is not configured (set LASTFM_API_KEY or [lastfm] api_key)")?;

    tracing::info!(model = provider.model(), "conversation ready");

    Ok(Conversation::new(
        Arc::new(provider),
        Arc::new(backend),
        ConversationSettings::from(&config.assistant),
    ))
}

/// One turn with a fresh history. The reply goes to `out`; a failure is
/// returned untouched so the caller reports it once.
pub async fn ask(conversation: &Conversation, text: &str, out: &mut impl Write) -> Result<()> {
    let mut history = Vec::new();
    let reply = conversation.send(text, &mut history).await?;
    writeln!(out, "{}", reply)?;
    Ok(())
}

pub fn functions() -> Result<()> {
    let json = serde_json::to_string_pretty(beatchat::catalog())?;
    println!("{}", json);
    Ok(())
}

pub fn show_config(config: &BeatConfig, sources: &ConfigSources) {
    println!("{}", "# Config files".bright_cyan());
    if sources.files.is_empty() {
        println!("#   (none, using defaults)");
    }
    for file in &sources.files {
        println!("#   {}", file.display());
    }

    if !sources.env_overrides.is_empty() {
        println!("{}", "# Environment overrides".bright_cyan());
        for var in &sources.env_overrides {
            println!("#   {}", var);
        }
    }

    println!();
    print!("{}", config.to_toml());
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use beatchat::{ChatProvider, CompletionRequest, CompletionResponse, ProviderError};
    use musicdata::LastFmClient;

    struct Unreachable;

    #[async_trait]
    impl ChatProvider for Unreachable {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    fn offline_conversation() -> Conversation {
        let client = LastFmClient::new("http://127.0.0.1:9/", "test-key").unwrap();
        Conversation::new(
            Arc::new(Unreachable),
            Arc::new(LastFmBackend::new(client)),
            ConversationSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_ask_failure_is_returned_without_output() {
        let conversation = offline_conversation();
        let mut out = Vec::new();

        let err = ask(&conversation, "play something", &mut out)
            .await
            .unwrap_err();

        assert!(out.is_empty());
        assert!(err.downcast_ref::<beatchat::ChatError>().is_some());
    }
}
