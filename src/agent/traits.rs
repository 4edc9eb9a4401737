//! Agent trait definition.
//!
//! Agents that talk to a model (synthesizer, redline drafter) implement this
//! trait, which gives the orchestrator a uniform way to run them.

use async_trait::async_trait;

use super::gateway::LlmGateway;
use super::message::Completion;
use crate::error::AgentError;

/// Trait implemented by all model-backed agents.
///
/// An agent is a fixed role: a name and a system prompt. Sampling settings
/// and provider choice belong to the [`LlmGateway`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and identification.
    fn name(&self) -> &'static str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Executes the agent with the given user message.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error (strict posture only).
    async fn execute(
        &self,
        gateway: &LlmGateway,
        user_msg: &str,
    ) -> Result<Completion, AgentError> {
        tracing::debug!(agent = self.name(), prompt_len = user_msg.len(), "executing agent");
        gateway.complete(user_msg, Some(self.system_prompt())).await
    }
}
