//! Google Gemini provider using the `generateContent` REST endpoint.
//!
//! Gemini receives a single user turn; the system prompt is prepended to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{http_client, non_empty, send_json};
use crate::agent::config::{AgentConfig, ProviderKind};
use crate::agent::message::CompletionRequest;
use crate::agent::provider::{LlmProvider, ProviderResult};

const NAME: &str = "gemini";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini provider.
pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Creates a provider from agent configuration. Returns `None` when no
    /// Gemini API key is configured.
    #[must_use]
    pub fn new(config: &AgentConfig) -> Option<Self> {
        let settings = config.provider(ProviderKind::Gemini);
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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult {
        let prompt = request.flattened_prompt();
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let response: GenerateContentResponse = send_json(
            NAME,
            self.http
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&body),
        )
        .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        non_empty(NAME, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use mockito::{Matcher, Server};

    fn provider(base_url: &str) -> GeminiProvider {
        let config = AgentConfig::builder()
            .api_key(ProviderKind::Gemini, "gm-test")
            .base_url(ProviderKind::Gemini, base_url)
            .build()
            .unwrap_or_else(|_| unreachable!());
        GeminiProvider::new(&config).unwrap_or_else(|| unreachable!())
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: Some("You are a contract analyst.".to_string()),
            prompt: "Is the cap mutual?".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "gm-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "You are a contract analyst.\n\nIs the cap mutual?"}]}],
                "generationConfig": {"maxOutputTokens": 1000}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Yes, "},{"text":"it is mutual [1]."}]}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url()).complete(&request()).await;
        assert_eq!(text.ok().as_deref(), Some("Yes, it is mutual [1]."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_status_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"message":"quota exceeded"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url())
            .complete(&request())
            .await
            .err()
            .unwrap_or_else(|| unreachable!());
        assert_eq!(err.provider, "gemini");
        assert_eq!(err.kind, ProviderErrorKind::Status(429));
        assert!(err.message.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_complete_without_candidates_is_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).complete(&request()).await.err();
        assert_eq!(err.map(|e| e.kind), Some(ProviderErrorKind::EmptyResponse));
    }
}
