//! Redline proposer: one safer replacement clause.
//!
//! Two variants share one entry point. [`RedlinePolicy::Template`] picks a
//! vetted clause from [`SAFE_TEMPLATES`] by keyword and never touches the
//! network. [`RedlinePolicy::Drafted`] asks the model to draft one.

use async_trait::async_trait;

use super::config::RedlinePolicy;
use super::gateway::LlmGateway;
use super::prompt::build_redline_prompt;
use super::synthesizer::NO_RELEVANT_CLAUSES;
use super::traits::Agent;
use crate::error::AgentError;

/// Keyword-selected replacement clauses, in match priority order.
pub const SAFE_TEMPLATES: [(&str, &str); 4] = [
    (
        "liability",
        "Limitation of Liability. Except for gross negligence, willful misconduct, or IP \
         infringement, each party's aggregate liability arising out of or related to this \
         Agreement shall not exceed the fees paid or payable by Customer in the twelve (12) \
         months preceding the claim.",
    ),
    (
        "indemn",
        "Mutual Indemnification. Each party shall indemnify, defend, and hold the other party \
         harmless from third-party claims arising from such indemnifying party's breach of this \
         Agreement, gross negligence, or willful misconduct.",
    ),
    (
        "renewal",
        "Renewal; Opt-Out. This Agreement renews for successive one-year terms unless either \
         party provides written notice of non-renewal at least thirty (30) days prior to the \
         end of the then-current term.",
    ),
    (
        "notice",
        "Termination for Convenience. Either party may terminate this Agreement upon thirty \
         (30) days' prior written notice to the other party.",
    ),
];

/// Returns the template for the first keyword found in `clauses`, or the
/// liability template when none matches.
#[must_use]
pub fn select_template(clauses: &[&str]) -> &'static str {
    let joined = clauses.join(" ").to_lowercase();
    SAFE_TEMPLATES
        .iter()
        .find(|(keyword, _)| joined.contains(keyword))
        .unwrap_or(&SAFE_TEMPLATES[0])
        .1
}

/// Proposes a replacement clause under the configured policy.
pub struct RedlineProposer {
    policy: RedlinePolicy,
    system_prompt: String,
}

impl RedlineProposer {
    /// Creates a proposer.
    #[must_use]
    pub const fn new(policy: RedlinePolicy, system_prompt: String) -> Self {
        Self {
            policy,
            system_prompt,
        }
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> RedlinePolicy {
        self.policy
    }

    /// Proposes a safer clause for `clauses`.
    ///
    /// # Errors
    ///
    /// The template variant never fails. The drafted variant wraps gateway
    /// failures in [`AgentError::Redline`].
    pub async fn propose(
        &self,
        gateway: &LlmGateway,
        clauses: &[&str],
    ) -> Result<String, AgentError> {
        match self.policy {
            RedlinePolicy::Template => Ok(select_template(clauses).to_string()),
            RedlinePolicy::Drafted => {
                if clauses.is_empty() {
                    return Ok(NO_RELEVANT_CLAUSES.to_string());
                }
                let prompt = build_redline_prompt(clauses);
                self.execute(gateway, &prompt)
                    .await
                    .map(|completion| completion.text)
                    .map_err(|e| AgentError::Redline {
                        message: e.to_string(),
                    })
            }
        }
    }
}

#[async_trait]
impl Agent for RedlineProposer {
    fn name(&self) -> &'static str {
        "redline"
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::config::{AgentConfig, Posture};
    use test_case::test_case;

    fn gateway(posture: Posture) -> LlmGateway {
        let config = AgentConfig::builder()
            .posture(posture)
            .build()
            .unwrap_or_else(|_| unreachable!());
        LlmGateway::new(Vec::new(), &config)
    }

    #[test_case(&["Liability is unlimited."], "Limitation of Liability." ; "liability")]
    #[test_case(&["Vendor shall indemnify Customer."], "Mutual Indemnification." ; "indemnification")]
    #[test_case(&["This renewal is automatic."], "Renewal; Opt-Out." ; "renewal")]
    #[test_case(&["Upon notice the term ends."], "Termination for Convenience." ; "notice")]
    #[test_case(&["Fees are due monthly."], "Limitation of Liability." ; "default")]
    #[test_case(&[], "Limitation of Liability." ; "no clauses")]
    fn test_select_template(clauses: &[&str], prefix: &str) {
        assert!(select_template(clauses).starts_with(prefix));
    }

    #[test]
    fn test_liability_outranks_notice() {
        let clauses = ["Written notice is required.", "Liability is capped."];
        assert!(select_template(&clauses).starts_with("Limitation of Liability."));
    }

    #[tokio::test]
    async fn test_template_never_calls_gateway() {
        let proposer = RedlineProposer::new(RedlinePolicy::Template, String::new());
        let proposal = proposer
            .propose(&gateway(Posture::Strict), &["Automatic renewal applies."])
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(proposal.starts_with("Renewal; Opt-Out."));
    }

    #[tokio::test]
    async fn test_drafted_wraps_gateway_error() {
        let proposer = RedlineProposer::new(RedlinePolicy::Drafted, String::new());
        let result = proposer
            .propose(&gateway(Posture::Strict), &["Liability is unlimited."])
            .await;
        match result {
            Err(AgentError::Redline { message }) => assert!(message.contains("configured")),
            other => unreachable!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_drafted_lenient_returns_mock_text() {
        let proposer = RedlineProposer::new(RedlinePolicy::Drafted, String::new());
        let proposal = proposer
            .propose(&gateway(Posture::Lenient), &["Liability is unlimited."])
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(proposal, crate::agent::gateway::MOCK_RESPONSE);
    }
}
