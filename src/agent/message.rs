//! Provider-agnostic message types for LLM communication.
//!
//! These types decouple agent logic from any specific LLM SDK or HTTP API.

use serde::{Deserialize, Serialize};

/// Role of a chat message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
}

impl Role {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Message content.
    pub content: String,
}

/// A single-turn completion request (provider-agnostic).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system instructions.
    pub system_prompt: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Messages for chat-shaped APIs: the system prompt (if any) as its own
    /// message, then the user prompt.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(system_message(system));
        }
        messages.push(user_message(&self.prompt));
        messages
    }

    /// Single prompt for APIs without a system role: the system prompt is
    /// prepended with a blank line.
    #[must_use]
    pub fn flattened_prompt(&self) -> String {
        match self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            Some(system) => format!("{system}\n\n{}", self.prompt),
            None => self.prompt.clone(),
        }
    }
}

/// Where a completion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    /// A live provider.
    Provider(&'static str),
    /// The built-in mock responder.
    Mock,
}

impl std::fmt::Display for CompletionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(name) => f.write_str(name),
            Self::Mock => f.write_str("mock"),
        }
    }
}

/// Text returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Who produced it.
    pub source: CompletionSource,
}

impl Completion {
    /// Returns `true` if the text came from the mock responder.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self.source, CompletionSource::Mock)
    }
}

/// Creates a system message.
#[must_use]
pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::System,
        content: content.to_string(),
    }
}

/// Creates a user message.
#[must_use]
pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: content.to_string(),
    }
}
