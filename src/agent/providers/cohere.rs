//! Cohere provider using the v2 chat endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::{http_client, non_empty, send_json};
use crate::agent::config::{AgentConfig, ProviderKind};
use crate::agent::message::CompletionRequest;
use crate::agent::provider::{LlmProvider, ProviderResult};

const NAME: &str = "cohere";

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Cohere provider.
pub struct CohereProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CohereProvider {
    /// Creates a provider from agent configuration. Returns `None` when no
    /// Cohere API key is configured.
    #[must_use]
    pub fn new(config: &AgentConfig) -> Option<Self> {
        let settings = config.provider(ProviderKind::Cohere);
        let api_key = settings.api_key.clone()?;
        Some(Self {
            http: http_client(config.timeout),
            api_key,
            base_url: settings
                .base_url
                .as_deref()
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            model: settings.model.clone(),
        })
    }
}

impl std::fmt::Debug for CohereProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for CohereProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult {
        let body = serde_json::json!({
            "model": self.model,
            "messages": request.messages(),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response: ChatResponse = send_json(
            NAME,
            self.http
                .post(format!("{}/v2/chat", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body),
        )
        .await?;

        let text = response
            .message
            .map(|m| m.content.into_iter().filter_map(|b| b.text).collect::<String>())
            .unwrap_or_default();

        non_empty(NAME, text)
    }
}
