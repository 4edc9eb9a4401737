//! Concrete LLM provider implementations.
//!
//! `OpenAI` and Groq share the `async-openai` client; Gemini and Cohere are
//! plain JSON over `reqwest`.

pub mod cohere;
pub mod gemini;
pub mod openai;

pub use cohere::CohereProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{ProviderError, ProviderErrorKind};

/// Builds the shared HTTP client for JSON providers.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build HTTP client with timeout, using defaults");
            reqwest::Client::new()
        })
}

/// Sends a prepared request and decodes a JSON body.
///
/// Non-success statuses become [`ProviderErrorKind::Status`] with the body
/// (truncated) as the message.
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::new(provider, ProviderErrorKind::Request, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error response".to_string());
        return Err(ProviderError::new(
            provider,
            ProviderErrorKind::Status(status.as_u16()),
            crate::core::truncate_graphemes(&body, 200),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::new(provider, ProviderErrorKind::Request, e.to_string()))
}

/// Rejects blank completions.
pub(crate) fn non_empty(provider: &'static str, text: String) -> Result<String, ProviderError> {
    if text.trim().is_empty() {
        Err(ProviderError::new(
            provider,
            ProviderErrorKind::EmptyResponse,
            "response contained no text",
        ))
    } else {
        Ok(text)
    }
}
