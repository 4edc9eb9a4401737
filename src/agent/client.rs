//! Provider registry and factory.
//!
//! Maps configured provider kinds to concrete [`LlmProvider`] implementations,
//! in the configured try order.

use std::sync::Arc;

use crate::agent::config::{AgentConfig, ProviderKind};
use crate::agent::provider::LlmProvider;
use crate::agent::providers::{CohereProvider, GeminiProvider, OpenAiProvider};

/// Creates the provider for `kind`, or `None` when it has no API key.
#[must_use]
pub fn create_provider(config: &AgentConfig, kind: ProviderKind) -> Option<Arc<dyn LlmProvider>> {
    match kind {
        ProviderKind::OpenAi | ProviderKind::Groq => {
            OpenAiProvider::new(config, kind).map(|p| Arc::new(p) as Arc<dyn LlmProvider>)
        }
        ProviderKind::Gemini => {
            GeminiProvider::new(config).map(|p| Arc::new(p) as Arc<dyn LlmProvider>)
        }
        ProviderKind::Cohere => {
            CohereProvider::new(config).map(|p| Arc::new(p) as Arc<dyn LlmProvider>)
        }
    }
}

/// Builds the ordered provider registry from configuration.
///
/// Providers without credentials are skipped; an empty registry means the
/// gateway is unconfigured.
#[must_use]
pub fn build_registry(config: &AgentConfig) -> Vec<Arc<dyn LlmProvider>> {
    let registry: Vec<_> = config
        .provider_order
        .iter()
        .filter_map(|kind| create_provider(config, *kind))
        .collect();

    tracing::debug!(
        providers = ?registry.iter().map(|p| p.name()).collect::<Vec<_>>(),
        "built provider registry"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_without_keys() {
        let config = AgentConfig::builder()
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert!(build_registry(&config).is_empty());
    }

    #[test]
    fn test_registry_follows_order() {
        let config = AgentConfig::builder()
            .api_key(ProviderKind::OpenAi, "sk")
            .api_key(ProviderKind::Cohere, "co")
            .api_key(ProviderKind::Gemini, "gm")
            .provider_order("cohere,openai,gemini")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let names: Vec<_> = build_registry(&config).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["cohere", "openai", "gemini"]);
    }

    #[test]
    fn test_unordered_provider_is_excluded() {
        let config = AgentConfig::builder()
            .api_key(ProviderKind::Groq, "gsk")
            .api_key(ProviderKind::OpenAi, "sk")
            .provider_order("openai")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let names: Vec<_> = build_registry(&config).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["openai"]);
    }
}
