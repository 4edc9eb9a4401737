//! Answer synthesizer.
//!
//! Produces a short answer grounded only in the retrieved clauses, with
//! `[n]` references back to them.

use async_trait::async_trait;

use super::gateway::LlmGateway;
use super::message::Completion;
use super::prompt::{PromptClause, build_synthesis_prompt};
use super::traits::Agent;
use crate::core::Intent;
use crate::error::AgentError;

/// Answer returned when retrieval found nothing to ground on.
pub const NO_RELEVANT_CLAUSES: &str = "No relevant clauses were found in the contract for \
this question. Try rephrasing it or check that the right document was loaded.";

/// Agent that writes the final answer.
pub struct SynthesizerAgent {
    system_prompt: String,
}

impl SynthesizerAgent {
    /// Creates a synthesizer with the given system prompt.
    #[must_use]
    pub const fn new(system_prompt: String) -> Self {
        Self { system_prompt }
    }

    /// Answers `query` from `clauses`.
    ///
    /// Returns [`NO_RELEVANT_CLAUSES`] without calling the gateway when
    /// `clauses` is empty.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error (strict posture only).
    pub async fn synthesize(
        &self,
        gateway: &LlmGateway,
        query: &str,
        clauses: &[PromptClause<'_>],
        intent: Intent,
    ) -> Result<String, AgentError> {
        if clauses.is_empty() {
            return Ok(NO_RELEVANT_CLAUSES.to_string());
        }
        let prompt = build_synthesis_prompt(query, clauses, intent);
        let Completion { text, .. } = self.execute(gateway, &prompt).await?;
        Ok(text)
    }
}

#[async_trait]
impl Agent for SynthesizerAgent {
    fn name(&self) -> &'static str {
        "synthesizer"
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}
