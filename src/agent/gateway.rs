//! LLM gateway: ordered provider fallthrough with a mock fallback.
//!
//! Providers are tried in registry order. Each call is bounded by the
//! configured timeout; any failure is logged and the next provider is
//! tried immediately. What happens when nothing answers depends on the
//! [`Posture`].

use std::sync::Arc;
use std::time::Duration;

use super::client::build_registry;
use super::config::{AgentConfig, Posture};
use super::message::{Completion, CompletionRequest, CompletionSource};
use super::provider::LlmProvider;
use crate::error::{AgentError, ProviderError, ProviderErrorKind};

/// Text returned in lenient posture when no provider produced an answer.
pub const MOCK_RESPONSE: &str = "Demo mode: no LLM provider produced an answer, so this is a \
placeholder response. Add an API key (OPENAI_API_KEY, GROQ_API_KEY, GEMINI_API_KEY or \
COHERE_API_KEY) to get a model-generated analysis of the retrieved clauses.";

/// Multi-provider completion gateway.
pub struct LlmGateway {
    providers: Vec<Arc<dyn LlmProvider>>,
    posture: Posture,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl LlmGateway {
    /// Creates a gateway over an explicit provider list.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>, config: &AgentConfig) -> Self {
        Self {
            providers,
            posture: config.posture,
            timeout: config.timeout,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Creates a gateway with every credentialed provider, in configured order.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(build_registry(config), config)
    }

    /// `true` when at least one provider is registered.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Registered provider names in try order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// The failure posture.
    #[must_use]
    pub const fn posture(&self) -> Posture {
        self.posture
    }

    /// Completes `prompt` with the first provider that succeeds.
    ///
    /// # Errors
    ///
    /// In strict posture, returns [`AgentError::NotConfigured`] when no
    /// provider is registered and [`AgentError::AllProvidersFailed`] when
    /// every provider failed. Lenient posture never fails; it returns
    /// [`MOCK_RESPONSE`] instead.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<Completion, AgentError> {
        if self.providers.is_empty() {
            return match self.posture {
                Posture::Strict => Err(AgentError::NotConfigured),
                Posture::Lenient => {
                    tracing::debug!("no providers configured, returning mock response");
                    Ok(mock_completion())
                }
            };
        }

        let request = CompletionRequest {
            system_prompt: system_prompt.map(ToString::to_string),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut failures = Vec::new();
        for provider in &self.providers {
            let name = provider.name();
            tracing::debug!(provider = name, prompt_len = prompt.len(), "calling provider");

            let outcome = match tokio::time::timeout(self.timeout, provider.complete(&request)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::new(
                    name,
                    ProviderErrorKind::Timeout,
                    format!("no response within {}s", self.timeout.as_secs_f32()),
                )),
            };

            match outcome {
                Ok(text) => {
                    tracing::info!(provider = name, response_len = text.len(), "completion succeeded");
                    return Ok(Completion {
                        text,
                        source: CompletionSource::Provider(name),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = name, error = %e, "provider failed, trying next");
                    failures.push(e);
                }
            }
        }

        match self.posture {
            Posture::Strict => Err(AgentError::AllProvidersFailed { failures }),
            Posture::Lenient => {
                tracing::warn!(
                    attempts = failures.len(),
                    "all providers failed, returning mock response"
                );
                Ok(mock_completion())
            }
        }
    }
}

fn mock_completion() -> Completion {
    Completion {
        text: MOCK_RESPONSE.to_string(),
        source: CompletionSource::Mock,
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("providers", &self.provider_names())
            .field("posture", &self.posture)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
