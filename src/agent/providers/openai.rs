//! `OpenAI` provider implementation using the `async-openai` crate.
//!
//! Also serves Groq, whose API is `OpenAI`-compatible; only the base URL,
//! model and reported name differ.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_trait::async_trait;

use super::non_empty;
use crate::agent::config::{AgentConfig, ProviderKind};
use crate::agent::message::{ChatMessage, CompletionRequest, Role};
use crate::agent::provider::{LlmProvider, ProviderResult};
use crate::error::{ProviderError, ProviderErrorKind};

/// `OpenAI`-compatible LLM provider.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    name: &'static str,
}

impl OpenAiProvider {
    /// Creates a provider for `kind` (`OpenAi` or `Groq`) from agent
    /// configuration. Returns `None` when the provider has no API key.
    #[must_use]
    pub fn new(config: &AgentConfig, kind: ProviderKind) -> Option<Self> {
        let settings = config.provider(kind);
        let api_key = settings.api_key.as_deref()?;

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(ref base_url) = settings.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Some(Self {
            client: Client::with_config(openai_config),
            model: settings.model.clone(),
            name: kind.as_str(),
        })
    }

    /// Converts our message type to the `OpenAI` SDK type.
    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }),
        }
    }

    /// Builds an `OpenAI` chat completion request from our generic request.
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages().iter().map(Self::convert_message).collect(),
            temperature: Some(request.temperature),
            max_completion_tokens: Some(request.max_tokens),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult {
        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(|e| ProviderError::new(self.name, ProviderErrorKind::Request, e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        non_empty(self.name, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message;

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key(ProviderKind::OpenAi, "sk-test")
            .api_key(ProviderKind::Groq, "gsk-test")
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_convert_system_message() {
        let converted = OpenAiProvider::convert_message(&message::system_message("test"));
        assert!(matches!(converted, ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn test_convert_user_message() {
        let converted = OpenAiProvider::convert_message(&message::user_message("hello"));
        assert!(matches!(converted, ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_missing_key_yields_none() {
        let config = AgentConfig::builder()
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert!(OpenAiProvider::new(&config, ProviderKind::OpenAi).is_none());
    }

    #[test]
    fn test_groq_reports_its_name() {
        let provider =
            OpenAiProvider::new(&config(), ProviderKind::Groq).unwrap_or_else(|| unreachable!());
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_build_request() {
        let provider =
            OpenAiProvider::new(&config(), ProviderKind::OpenAi).unwrap_or_else(|| unreachable!());
        let built = provider.build_request(&CompletionRequest {
            system_prompt: Some("You are a contract analyst.".to_string()),
            prompt: "What is the cap?".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
        });
        assert_eq!(built.model, "gpt-4o");
        assert_eq!(built.messages.len(), 2);
        assert_eq!(built.temperature, Some(0.3));
        assert_eq!(built.max_completion_tokens, Some(1000));
    }
}
