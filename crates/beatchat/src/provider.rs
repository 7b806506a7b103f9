//! Chat-completion provider boundary.

// The function-calling fields are deprecated upstream in favour of tools.
#![allow(deprecated)]

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionFunctionCall, ChatCompletionFunctions, ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestFunctionMessage, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, FunctionCall as OpenAiFunctionCall, Role as OpenAiRole,
};
use async_openai::Client;
use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::FunctionDescriptor;
use crate::types::{FunctionCall, Message, Role};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("model provider request failed: {0}")]
    Api(#[from] OpenAIError),

    #[error("model provider returned no choices")]
    EmptyResponse,

    #[error("model provider is not configured: {0}")]
    NotConfigured(String),
}

/// How the model may use the offered functions. Leaving the policy off a
/// request lets the provider apply its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCallPolicy {
    Auto,
}

/// Provider-neutral chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Sent ahead of `messages` when present.
    pub system: Option<String>,
    pub messages: Vec<Message>,
    /// Function catalog; `None` means function calling is off for this request.
    pub functions: Option<&'static [FunctionDescriptor]>,
    pub function_call: Option<FunctionCallPolicy>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// First choice of a completion, reduced to what the conversation loop needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub role: Role,
    pub content: Option<String>,
    pub function_call: Option<FunctionCall>,
}

impl CompletionResponse {
    /// Plain text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            function_call: None,
        }
    }

    /// Reply that requests a function call.
    pub fn call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            function_call: Some(FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            }),
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// OpenAI (or compatible) chat completions.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    /// Build from the `[openai]` config section.
    pub fn from_config(config: &beatconf::OpenAiConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured(
                    "no API key (set OPENAI_API_KEY or [openai] api_key)".to_string(),
                )
            })?;

        Ok(Self::new(&config.base_url, api_key, &config.model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Translate a provider-neutral request into the OpenAI wire request.
    pub fn build_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<CreateChatCompletionRequest, ProviderError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.as_str())
                    .build()?
                    .into(),
            );
        }

        for msg in &request.messages {
            messages.push(Self::convert_message(msg)?);
        }

        let functions = request.functions.map(|catalog| {
            catalog
                .iter()
                .map(|f| ChatCompletionFunctions {
                    name: f.name.to_string(),
                    description: Some(f.description.to_string()),
                    parameters: f.parameters.clone(),
                })
                .collect()
        });

        let function_call = request.function_call.map(|policy| match policy {
            FunctionCallPolicy::Auto => ChatCompletionFunctionCall::Auto,
        });

        Ok(CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            functions,
            function_call,
            max_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature),
            ..Default::default()
        })
    }

    fn convert_message(msg: &Message) -> Result<ChatCompletionRequestMessage, ProviderError> {
        let converted = match msg.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone().unwrap_or_default())
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone().unwrap_or_default())
                .build()?
                .into(),
            Role::Assistant => {
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: msg.content.clone().map(Into::into),
                    function_call: msg.function_call.as_ref().map(|c| OpenAiFunctionCall {
                        name: c.name.clone(),
                        arguments: c.arguments.clone(),
                    }),
                    ..Default::default()
                })
            }
            Role::Function => {
                ChatCompletionRequestMessage::Function(ChatCompletionRequestFunctionMessage {
                    content: msg.content.clone(),
                    name: msg.name.clone().unwrap_or_default(),
                })
            }
        };

        Ok(converted)
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    #[tracing::instrument(
        skip(self, request),
        fields(
            llm.model = %self.model,
            llm.messages = request.messages.len(),
            llm.functions = request.functions.map(|f| f.len()).unwrap_or(0),
        )
    )]
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let wire = self.build_request(&request)?;
        let response = self.client.chat().create(wire).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;
        tracing::debug!(finish_reason = ?choice.finish_reason, "completion received");

        let message = choice.message;
        let role = match message.role {
            OpenAiRole::System => Role::System,
            OpenAiRole::User => Role::User,
            OpenAiRole::Function => Role::Function,
            _ => Role::Assistant,
        };

        // Compatible servers that only speak tools report the call there
        let function_call = message
            .function_call
            .or_else(|| {
                message
                    .tool_calls
                    .and_then(|calls| calls.into_iter().next())
                    .map(|call| call.function)
            })
            .map(|call| FunctionCall {
                name: call.name,
                arguments: call.arguments,
            });

        Ok(CompletionResponse {
            role,
            content: message.content,
            function_call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use serde_json::Value;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new("http://localhost:9/v1", "sk-test", "gpt-4o-mini")
    }

    fn wire_json(request: &CompletionRequest) -> Value {
        serde_json::to_value(provider().build_request(request).unwrap()).unwrap()
    }

    #[test]
    fn test_first_round_request_shape() {
        let request = CompletionRequest {
            system: Some("be helpful".to_string()),
            messages: vec![Message::user("Find the song Yesterday")],
            functions: Some(catalog()),
            function_call: Some(FunctionCallPolicy::Auto),
            max_tokens: 250,
            temperature: 0.7,
        };

        let json = wire_json(&request);
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["function_call"], "auto");
        assert_eq!(json["max_tokens"], 250);
        assert_eq!(json["functions"].as_array().unwrap().len(), 10);
        assert_eq!(json["functions"][0]["name"], "searchTrack");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Find the song Yesterday");
    }

    #[test]
    fn test_follow_up_request_has_no_functions() {
        let request = CompletionRequest {
            system: None,
            messages: vec![
                Message::user("what's on my playlist?"),
                Message::assistant(
                    None,
                    Some(FunctionCall {
                        name: "printPlaylist".to_string(),
                        arguments: "{}".to_string(),
                    }),
                ),
                Message::function_result("printPlaylist", "[]"),
            ],
            functions: None,
            function_call: None,
            max_tokens: 75,
            temperature: 0.7,
        };

        let json = wire_json(&request);
        assert!(json.get("functions").is_none());
        assert!(json.get("function_call").is_none());
        assert_eq!(json["messages"].as_array().unwrap().len(), 3);
        assert_eq!(
            json["messages"][1]["function_call"]["name"],
            "printPlaylist"
        );
        assert_eq!(json["messages"][2]["role"], "function");
        assert_eq!(json["messages"][2]["name"], "printPlaylist");
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = beatconf::OpenAiConfig::default();
        assert!(matches!(
            OpenAiProvider::from_config(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
