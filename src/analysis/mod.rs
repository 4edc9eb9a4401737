//! Structured clause analysis: risk, metadata and compliance.
//!
//! [`ClauseAnalyzer`] sends a schema-specific prompt through the gateway and
//! decodes the reply with [`parser::parse_structured`]. When the reply is the
//! gateway's mock text or fails to parse, lenient posture substitutes the
//! matching keyword heuristic from [`mock`]; strict posture returns the error.

pub mod mock;
pub mod parser;
pub mod schema;

use std::sync::Arc;

pub use parser::{extract_json_object, parse_structured};
pub use schema::{
    ClauseType, ComplianceAnalysis, ComplianceLevel, Framework, FrameworkAssessment,
    MetadataExtraction, RiskAnalysis, Structured,
};

use crate::agent::config::Posture;
use crate::agent::gateway::LlmGateway;
use crate::agent::prompt::{
    PromptSet, build_compliance_prompt, build_metadata_prompt, build_risk_prompt,
};
use crate::error::AgentError;

/// Runs structured analyses of single clauses.
pub struct ClauseAnalyzer {
    gateway: Arc<LlmGateway>,
    prompts: PromptSet,
}

impl ClauseAnalyzer {
    /// Creates an analyzer over a shared gateway.
    #[must_use]
    pub const fn new(gateway: Arc<LlmGateway>, prompts: PromptSet) -> Self {
        Self { gateway, prompts }
    }

    /// Classifies the risk of `clause`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyInput`] for a blank clause. In strict
    /// posture, gateway and parse errors are returned as-is.
    pub async fn analyze_risk(&self, clause: &str) -> Result<RiskAnalysis, AgentError> {
        self.run(&self.prompts.risk, &build_risk_prompt(clause), clause, || {
            mock::risk(clause)
        })
        .await
    }

    /// Extracts key terms from `clause`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze_risk`].
    pub async fn extract_metadata(&self, clause: &str) -> Result<MetadataExtraction, AgentError> {
        self.run(
            &self.prompts.metadata,
            &build_metadata_prompt(clause),
            clause,
            || mock::metadata(clause),
        )
        .await
    }

    /// Scores `clause` against `frameworks` (the default pair when empty).
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze_risk`].
    pub async fn analyze_compliance(
        &self,
        clause: &str,
        frameworks: &[Framework],
    ) -> Result<ComplianceAnalysis, AgentError> {
        let frameworks = if frameworks.is_empty() {
            &Framework::DEFAULT[..]
        } else {
            frameworks
        };
        self.run(
            &self.prompts.compliance,
            &build_compliance_prompt(clause, frameworks),
            clause,
            || mock::compliance(clause, frameworks),
        )
        .await
    }

    async fn run<T: Structured>(
        &self,
        system_prompt: &str,
        prompt: &str,
        clause: &str,
        fallback: impl FnOnce() -> T + Send,
    ) -> Result<T, AgentError> {
        if clause.trim().is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let completion = self.gateway.complete(prompt, Some(system_prompt)).await?;
        if completion.is_mock() {
            tracing::debug!(schema = T::SCHEMA, "mock completion, using keyword analysis");
            return Ok(fallback());
        }

        match parse_structured::<T>(&completion.text) {
            Ok(value) => Ok(value),
            Err(e) => match self.gateway.posture() {
                Posture::Strict => Err(e),
                Posture::Lenient => {
                    tracing::warn!(
                        schema = T::SCHEMA,
                        provider = %completion.source,
                        error = %e,
                        "unparseable model output, using keyword analysis"
                    );
                    Ok(fallback())
                }
            },
        }
    }
}

impl std::fmt::Debug for ClauseAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseAnalyzer")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}
