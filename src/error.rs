//! Error types for contract-copilot.
//!
//! Each layer has its own `thiserror` enum; [`Error`] aggregates them for
//! the CLI. Provider failures ([`ProviderError`]) never escape the gateway:
//! they are logged and either fall through to the next provider or are
//! collected into [`AgentError::AllProvidersFailed`].

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// LLM gateway, pipeline or structured-output failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Retrieval failure.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Filesystem failure outside document loading, e.g. writing prompt
    /// templates.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the agent pipeline and the LLM gateway.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Strict posture with no provider configured.
    #[error("no LLM providers configured; set one of OPENAI_API_KEY, GROQ_API_KEY, GEMINI_API_KEY or COHERE_API_KEY")]
    NotConfigured,

    /// Every configured provider failed for a single call.
    #[error("all LLM providers failed: {}", summarize(.failures))]
    AllProvidersFailed {
        /// One entry per attempted provider, in attempt order.
        failures: Vec<ProviderError>,
    },

    /// A provider response could not be decoded into the expected schema.
    #[error("failed to parse model response: {message}")]
    ResponseParse {
        /// What went wrong.
        message: String,
        /// The raw response text (for diagnostics).
        content: String,
    },

    /// No clauses were available to work from.
    #[error("no clauses available")]
    EmptyInput,

    /// Drafting a replacement clause failed.
    #[error("redline drafting failed: {message}")]
    Redline {
        /// Underlying failure.
        message: String,
    },

    /// The request itself was rejected before any work was done.
    #[error("orchestration error: {message}")]
    Orchestration {
        /// Reason for rejection.
        message: String,
    },

    /// Configuration values failed validation.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Offending setting.
        message: String,
    },

    /// Unknown provider name in the provider order.
    #[error("unsupported LLM provider: {name}")]
    UnsupportedProvider {
        /// The name that was requested.
        name: String,
    },
}

/// Category of a single provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Transport or SDK error before a response was received.
    Request,
    /// Non-success HTTP status.
    Status(u16),
    /// The call exceeded the configured timeout.
    Timeout,
    /// The response decoded but carried no text.
    EmptyResponse,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request failed"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Timeout => f.write_str("timed out"),
            Self::EmptyResponse => f.write_str("empty response"),
        }
    }
}

/// Failure of a single provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider}: {kind}: {message}")]
pub struct ProviderError {
    /// Provider name (e.g. `"groq"`).
    pub provider: &'static str,
    /// Failure category.
    pub kind: ProviderErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    #[must_use]
    pub fn new(provider: &'static str, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }
}

fn summarize(failures: &[ProviderError]) -> String {
    if failures.is_empty() {
        return "no attempts".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by the retrieval layer.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The index was built over a different clause list.
    #[error("index covers {indexed} clauses but {given} were supplied")]
    IndexMismatch {
        /// Clause count the index was built with.
        indexed: usize,
        /// Clause count passed to retrieval.
        given: usize,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Invalid argument combination or value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No input text could be obtained.
    #[error("no input: {0}")]
    NoInput(String),

    /// Output could not be written.
    #[error("output error: {0}")]
    Output(String),

    /// Async runtime could not be created.
    #[error("runtime error: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_providers_failed_lists_each_attempt() {
        let err = AgentError::AllProvidersFailed {
            failures: vec![
                ProviderError::new("groq", ProviderErrorKind::Status(429), "rate limited"),
                ProviderError::new("gemini", ProviderErrorKind::Timeout, "60s elapsed"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("groq: HTTP 429: rate limited"));
        assert!(text.contains("gemini: timed out: 60s elapsed"));
    }

    #[test]
    fn test_error_from_agent_error() {
        let err: Error = AgentError::EmptyInput.into();
        assert!(matches!(err, Error::Agent(AgentError::EmptyInput)));
    }

    #[test]
    fn test_io_error_keeps_message() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "I/O error: read-only");
    }

    #[test]
    fn test_not_configured_names_env_vars() {
        let text = AgentError::NotConfigured.to_string();
        assert!(text.contains("OPENAI_API_KEY"));
        assert!(text.contains("COHERE_API_KEY"));
    }
}
