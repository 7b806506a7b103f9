use std::sync::Arc;

use musicdata::MusicBackend;

use crate::calls::MusicCall;
use crate::catalog::catalog;
use crate::dispatch::dispatch;
use crate::error::{ChatError, TurnError};
use crate::provider::{ChatProvider, CompletionRequest, FunctionCallPolicy};
use crate::sanitize::sanitize;
use crate::types::Message;

/// Generation settings for a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSettings {
    pub system_prompt: String,
    pub temperature: f32,
    /// Cap for the round that may request a function.
    pub max_tokens: u32,
    /// Cap for the round that follows a function result.
    pub followup_max_tokens: u32,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self::from(&beatconf::AssistantConfig::default())
    }
}

impl From<&beatconf::AssistantConfig> for ConversationSettings {
    fn from(config: &beatconf::AssistantConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            followup_max_tokens: config.followup_max_tokens,
        }
    }
}

/// Drives one user turn at a time through the model and the music backend.
///
/// The history is owned by the caller and passed in on every turn, so several
/// independent conversations can share one `Conversation`.
pub struct Conversation {
    provider: Arc<dyn ChatProvider>,
    backend: Arc<dyn MusicBackend>,
    settings: ConversationSettings,
}

impl Conversation {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        backend: Arc<dyn MusicBackend>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            provider,
            backend,
            settings,
        }
    }

    /// Run one turn and return the assistant's reply text.
    ///
    /// Messages are appended to `history` as the turn progresses and are kept
    /// even when the turn fails part way.
    #[tracing::instrument(skip(self, user_input, history), fields(history.len = history.len()))]
    pub async fn send(
        &self,
        user_input: &str,
        history: &mut Vec<Message>,
    ) -> Result<String, ChatError> {
        match self.run_turn(user_input, history).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                Err(ChatError::from(e))
            }
        }
    }

    async fn run_turn(
        &self,
        user_input: &str,
        history: &mut Vec<Message>,
    ) -> Result<String, TurnError> {
        if !user_input.is_empty() {
            history.push(Message::user(user_input));
        }

        let first = self
            .provider
            .complete(CompletionRequest {
                system: Some(self.settings.system_prompt.clone()),
                messages: sanitize(history),
                functions: Some(catalog()),
                function_call: Some(FunctionCallPolicy::Auto),
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            })
            .await?;

        let Some(requested) = first.function_call else {
            history.push(Message::assistant(first.content.clone(), None));
            return Ok(first.content.unwrap_or_default());
        };

        // reject unknown names and bad arguments before touching history
        let call = MusicCall::parse(&requested.name, &requested.arguments)?;

        let content = first.content.filter(|c| !c.is_empty());
        history.push(Message::assistant(content, Some(requested)));

        let result = dispatch(self.backend.as_ref(), &call).await?;
        let payload = result.to_string();
        tracing::debug!(
            function = call.name(),
            bytes = payload.len(),
            "function result"
        );
        history.push(Message::function_result(call.name(), payload));

        let second = self
            .provider
            .complete(CompletionRequest {
                system: None,
                messages: sanitize(history),
                functions: None,
                function_call: None,
                max_tokens: self.settings.followup_max_tokens,
                temperature: self.settings.temperature,
            })
            .await?;

        history.push(Message::assistant(second.content.clone(), None));
        Ok(second.content.unwrap_or_default())
    }
}
