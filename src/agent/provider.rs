//! Pluggable LLM provider trait.
//!
//! Implementations translate a provider-agnostic [`CompletionRequest`] into
//! one HTTP or SDK call. Failures are returned as typed values, never
//! panics, so the gateway can fall through to the next provider.

use async_trait::async_trait;

use super::message::CompletionRequest;
use crate::error::ProviderError;

/// Outcome of a single provider call.
pub type ProviderResult = Result<String, ProviderError>;

/// Trait for LLM provider backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"groq"`, `"gemini"`).
    fn name(&self) -> &'static str;

    /// Executes one non-streaming completion and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failures, non-success status
    /// codes, or responses without text.
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult;
}
