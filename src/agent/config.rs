//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! Empty environment values are treated as unset.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::search::RetrievalMethod;

/// Sampling temperature used for every provider.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Completion token cap.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Per-provider call timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Clauses retrieved per query.
pub const DEFAULT_TOP_K: usize = 5;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_COHERE_MODEL: &str = "command-r";

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";

/// Fastest and cheapest first.
const DEFAULT_PROVIDER_ORDER: [ProviderKind; 4] = [
    ProviderKind::Groq,
    ProviderKind::Gemini,
    ProviderKind::OpenAi,
    ProviderKind::Cohere,
];

/// A supported LLM backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// `OpenAI` chat completions.
    OpenAi,
    /// Groq (`OpenAI`-compatible endpoint).
    Groq,
    /// Google Gemini `generateContent`.
    Gemini,
    /// Cohere chat v2.
    Cohere,
}

impl ProviderKind {
    /// All providers, in declaration order.
    pub const ALL: [Self; 4] = [Self::OpenAi, Self::Groq, Self::Gemini, Self::Cohere];

    /// Parses a provider name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedProvider`] for unknown names.
    pub fn parse(s: &str) -> Result<Self, AgentError> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "gemini" | "google" => Ok(Self::Gemini),
            "cohere" => Ok(Self::Cohere),
            other => Err(AgentError::UnsupportedProvider {
                name: other.to_string(),
            }),
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Gemini => "gemini",
            Self::Cohere => "cohere",
        }
    }

    /// Environment variable holding this provider's API key.
    #[must_use]
    pub const fn key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Cohere => "COHERE_API_KEY",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::OpenAi => 0,
            Self::Groq => 1,
            Self::Gemini => 2,
            Self::Cohere => 3,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when no provider can produce a usable answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Posture {
    /// Surface configuration, provider and parse errors to the caller.
    Strict,
    /// Substitute deterministic mock output.
    #[default]
    Lenient,
}

impl Posture {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// How replacement clauses are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedlinePolicy {
    /// Pick from the governed template library.
    #[default]
    Template,
    /// Ask the model to draft a replacement.
    Drafted,
}

impl RedlinePolicy {
    /// Parses a policy name (`template`, `drafted`/`llm`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "template" | "templates" => Some(Self::Template),
            "drafted" | "draft" | "llm" => Some(Self::Drafted),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Drafted => "drafted",
        }
    }
}

/// Connection settings for one provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// API key; the provider is skipped when absent.
    pub api_key: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
}

/// Configuration for the agent system.
#[derive(Clone)]
pub struct AgentConfig {
    providers: [ProviderSettings; 4],
    /// Order in which configured providers are tried.
    pub provider_order: Vec<ProviderKind>,
    /// Failure posture for the gateway and structured analyses.
    pub posture: Posture,
    /// Replacement clause policy.
    pub redline_policy: RedlinePolicy,
    /// Retrieval ranking method.
    pub retrieval: RetrievalMethod,
    /// Clauses retrieved per query.
    pub top_k: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Per-provider call timeout.
    pub timeout: Duration,
    /// Directory containing prompt template files.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] or
    /// [`AgentError::UnsupportedProvider`] for malformed values.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }

    /// Settings for `kind`.
    #[must_use]
    pub const fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        &self.providers[kind.slot()]
    }

    /// Providers in try order that have an API key.
    #[must_use]
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        self.provider_order
            .iter()
            .copied()
            .filter(|k| self.provider(*k).api_key.is_some())
            .collect()
    }

    /// `true` when no provider credential is present.
    #[must_use]
    pub fn demo_mode(&self) -> bool {
        self.providers.iter().all(|p| p.api_key.is_none())
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("configured", &self.configured_providers())
            .field("provider_order", &self.provider_order)
            .field("posture", &self.posture)
            .field("redline_policy", &self.redline_policy)
            .field("retrieval", &self.retrieval)
            .field("top_k", &self.top_k)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("prompt_dir", &self.prompt_dir)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    api_keys: [Option<String>; 4],
    base_urls: [Option<String>; 4],
    models: [Option<String>; 4],
    provider_order: Option<String>,
    posture: Option<Posture>,
    redline_policy: Option<RedlinePolicy>,
    retrieval: Option<RetrievalMethod>,
    top_k: Option<usize>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    prompt_dir: Option<PathBuf>,
}

/// Reads a variable, treating empty or whitespace-only values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(name: &str) -> Option<bool> {
    env_var(name).map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        for kind in ProviderKind::ALL {
            let slot = kind.slot();
            if self.api_keys[slot].is_none() {
                self.api_keys[slot] = env_var(kind.key_var());
            }
        }
        if self.base_urls[ProviderKind::OpenAi.slot()].is_none() {
            self.base_urls[ProviderKind::OpenAi.slot()] = env_var("OPENAI_BASE_URL");
        }
        if self.provider_order.is_none() {
            self.provider_order = env_var("COPILOT_PROVIDERS");
        }
        if self.posture.is_none() {
            self.posture = env_flag("COPILOT_STRICT")
                .map(|strict| if strict { Posture::Strict } else { Posture::Lenient });
        }
        if self.redline_policy.is_none() {
            self.redline_policy = env_var("COPILOT_REDLINE").and_then(|v| {
                let parsed = RedlinePolicy::parse(&v);
                if parsed.is_none() {
                    tracing::warn!(value = %v, "ignoring unknown COPILOT_REDLINE");
                }
                parsed
            });
        }
        if self.retrieval.is_none() {
            self.retrieval = env_var("COPILOT_RETRIEVAL").and_then(|v| RetrievalMethod::parse(&v));
        }
        if self.top_k.is_none() {
            self.top_k = env_var("COPILOT_TOP_K").and_then(|v| v.parse().ok());
        }
        if self.timeout.is_none() {
            self.timeout = env_var("COPILOT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = env_var("COPILOT_PROMPT_DIR").map(PathBuf::from);
        }
        self
    }

    /// Sets the API key for `kind`.
    #[must_use]
    pub fn api_key(mut self, kind: ProviderKind, key: impl Into<String>) -> Self {
        self.api_keys[kind.slot()] = Some(key.into());
        self
    }

    /// Sets the base URL override for `kind`.
    #[must_use]
    pub fn base_url(mut self, kind: ProviderKind, url: impl Into<String>) -> Self {
        self.base_urls[kind.slot()] = Some(url.into());
        self
    }

    /// Sets the model for `kind`.
    #[must_use]
    pub fn model(mut self, kind: ProviderKind, model: impl Into<String>) -> Self {
        self.models[kind.slot()] = Some(model.into());
        self
    }

    /// Sets the provider try order as a comma-separated list.
    #[must_use]
    pub fn provider_order(mut self, order: impl Into<String>) -> Self {
        self.provider_order = Some(order.into());
        self
    }

    /// Sets the failure posture.
    #[must_use]
    pub const fn posture(mut self, posture: Posture) -> Self {
        self.posture = Some(posture);
        self
    }

    /// Sets the redline policy.
    #[must_use]
    pub const fn redline_policy(mut self, policy: RedlinePolicy) -> Self {
        self.redline_policy = Some(policy);
        self
    }

    /// Sets the retrieval method.
    #[must_use]
    pub const fn retrieval(mut self, method: RetrievalMethod) -> Self {
        self.retrieval = Some(method);
        self
    }

    /// Sets the number of clauses retrieved per query.
    #[must_use]
    pub const fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the completion token cap.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the per-provider timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// A configuration without any API key is valid (demo mode).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] for a zero `top_k`, a
    /// temperature outside `0.0..=2.0` or an empty provider order, and
    /// [`AgentError::UnsupportedProvider`] for unknown provider names.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let provider_order = match self.provider_order.as_deref() {
            Some(list) => parse_order(list)?,
            None => DEFAULT_PROVIDER_ORDER.to_vec(),
        };

        let top_k = self.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(AgentError::InvalidConfig {
                message: "top_k must be at least 1".to_string(),
            });
        }

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AgentError::InvalidConfig {
                message: format!("temperature {temperature} outside 0.0..=2.0"),
            });
        }

        let [openai_key, groq_key, gemini_key, cohere_key] = self.api_keys;
        let [openai_url, groq_url, gemini_url, cohere_url] = self.base_urls;
        let [openai_model, groq_model, gemini_model, cohere_model] = self.models;

        let providers = [
            ProviderSettings {
                api_key: openai_key,
                base_url: openai_url,
                model: openai_model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            },
            ProviderSettings {
                api_key: groq_key,
                base_url: groq_url.or_else(|| Some(DEFAULT_GROQ_BASE_URL.to_string())),
                model: groq_model.unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            },
            ProviderSettings {
                api_key: gemini_key,
                base_url: gemini_url.or_else(|| Some(DEFAULT_GEMINI_BASE_URL.to_string())),
                model: gemini_model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            ProviderSettings {
                api_key: cohere_key,
                base_url: cohere_url.or_else(|| Some(DEFAULT_COHERE_BASE_URL.to_string())),
                model: cohere_model.unwrap_or_else(|| DEFAULT_COHERE_MODEL.to_string()),
            },
        ];

        Ok(AgentConfig {
            providers,
            provider_order,
            posture: self.posture.unwrap_or_default(),
            redline_policy: self.redline_policy.unwrap_or_default(),
            retrieval: self.retrieval.unwrap_or_default(),
            top_k,
            temperature,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            prompt_dir: self.prompt_dir,
        })
    }
}

/// Parses `"groq, openai"` into an ordered, de-duplicated provider list.
fn parse_order(list: &str) -> Result<Vec<ProviderKind>, AgentError> {
    let mut order = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let kind = ProviderKind::parse(name)?;
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    if order.is_empty() {
        return Err(AgentError::InvalidConfig {
            message: "provider order is empty".to_string(),
        });
    }
    Ok(order)
}
