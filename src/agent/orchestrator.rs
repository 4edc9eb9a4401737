//! Orchestrator for the clause question-answering pipeline.
//!
//! Runs a fixed sequence: classify → retrieve → synthesize, then proposes a
//! safer clause for redline requests and risk-flavored questions.

use std::sync::Arc;
use std::time::Instant;

use super::config::AgentConfig;
use super::gateway::LlmGateway;
use super::prompt::{PromptClause, PromptSet};
use super::redline::RedlineProposer;
use super::result::{AgentResult, Citation};
use super::synthesizer::SynthesizerAgent;
use crate::core::{Corpus, FileMap, Intent, classify, truncate_graphemes};
use crate::error::AgentError;
use crate::search::{RetrievalMethod, retrieve_with_fallback};

/// Longest accepted query, in bytes.
pub const MAX_QUERY_LEN: usize = 10_000;

/// Citation snippet length, in grapheme clusters.
pub const MAX_CITATION_CHARS: usize = 400;

/// Query substrings that trigger a proposal regardless of intent.
const RISK_KEYWORDS: &[&str] = &["liability", "indemn", "renewal", "notice", "risk"];

/// Orchestrates one query against a clause list.
pub struct Orchestrator {
    gateway: Arc<LlmGateway>,
    synthesizer: SynthesizerAgent,
    proposer: RedlineProposer,
    retrieval: RetrievalMethod,
}

impl Orchestrator {
    /// Creates an orchestrator, loading prompts from
    /// [`AgentConfig::prompt_dir`] with compiled-in defaults as fallback.
    #[must_use]
    pub fn new(gateway: Arc<LlmGateway>, config: &AgentConfig) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(gateway, config, prompts)
    }

    /// Creates an orchestrator with an explicit prompt set.
    #[must_use]
    pub fn with_prompts(gateway: Arc<LlmGateway>, config: &AgentConfig, prompts: PromptSet) -> Self {
        Self {
            gateway,
            synthesizer: SynthesizerAgent::new(prompts.synthesizer),
            proposer: RedlineProposer::new(config.redline_policy, prompts.redline),
            retrieval: config.retrieval,
        }
    }

    /// The gateway used for model calls.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<LlmGateway> {
        &self.gateway
    }

    /// Answers `query` from `clauses`.
    ///
    /// # Steps
    ///
    /// 1. Classify intent
    /// 2. Retrieve the top `top_k` clauses (keyword overlap if BM25 fails)
    /// 3. Synthesize an answer from those clauses only
    /// 4. Propose a safer clause for redline intents or risk keywords
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] for an empty or oversized query
    /// and the gateway's error if synthesis fails. Proposal failures are
    /// reported inside [`AgentResult::proposal`].
    pub async fn run(
        &self,
        query: &str,
        clauses: &[String],
        top_k: usize,
        file_map: Option<&FileMap>,
    ) -> Result<AgentResult, AgentError> {
        validate_query(query)?;
        let start = Instant::now();

        let intent = classify(query);
        tracing::info!(%intent, clauses = clauses.len(), top_k, "running pipeline");

        let (hits, method) = retrieve_with_fallback(query, clauses, self.retrieval, top_k);
        tracing::debug!(%method, hits = hits.len(), "retrieval complete");

        let source_of = move |index: usize| file_map.and_then(|map| map.source_of(index));
        let retrieved: Vec<PromptClause<'_>> = hits
            .iter()
            .map(|hit| PromptClause {
                text: &clauses[hit.index],
                source: source_of(hit.index),
            })
            .collect();

        let answer = self
            .synthesizer
            .synthesize(&self.gateway, query, &retrieved, intent)
            .await?;

        let proposal = if wants_proposal(intent, query) {
            let texts: Vec<&str> = retrieved.iter().map(|c| c.text).collect();
            match self.proposer.propose(&self.gateway, &texts).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "redline proposal failed");
                    Some(format!("Error: {e}"))
                }
            }
        } else {
            None
        };

        let citations = hits
            .iter()
            .map(|hit| Citation {
                index: hit.index,
                score: hit.score,
                text: truncate_graphemes(&clauses[hit.index], MAX_CITATION_CHARS),
                source: source_of(hit.index).map(ToString::to_string),
            })
            .collect();

        tracing::info!(
            %intent,
            citations = hits.len(),
            proposal = proposal.is_some(),
            elapsed_ms = start.elapsed().as_millis(),
            "pipeline complete"
        );

        Ok(AgentResult {
            intent,
            steps: intent.steps().to_vec(),
            citations,
            answer,
            proposal,
        })
    }

    /// Answers `query` from a merged corpus, citing source documents.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`].
    pub async fn run_corpus(
        &self,
        query: &str,
        corpus: &Corpus,
        top_k: usize,
    ) -> Result<AgentResult, AgentError> {
        self.run(query, corpus.clauses(), top_k, Some(corpus.file_map()))
            .await
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("gateway", &self.gateway)
            .field("redline_policy", &self.proposer.policy())
            .field("retrieval", &self.retrieval)
            .finish_non_exhaustive()
    }
}

fn validate_query(query: &str) -> Result<(), AgentError> {
    if query.trim().is_empty() {
        return Err(AgentError::Orchestration {
            message: "Query cannot be empty".to_string(),
        });
    }
    if query.len() > MAX_QUERY_LEN {
        return Err(AgentError::Orchestration {
            message: format!(
                "Query exceeds maximum length ({} bytes, max {MAX_QUERY_LEN})",
                query.len()
            ),
        });
    }
    Ok(())
}

fn wants_proposal(intent: Intent, query: &str) -> bool {
    if intent == Intent::Redline {
        return true;
    }
    let lower = query.to_lowercase();
    RISK_KEYWORDS.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::config::{Posture, RedlinePolicy};
    use crate::agent::gateway::MOCK_RESPONSE;
    use crate::agent::message::CompletionRequest;
    use crate::agent::provider::{LlmProvider, ProviderResult};
    use crate::agent::synthesizer::NO_RELEVANT_CLAUSES;
    use crate::core::Step;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers synthesis prompts and fails drafting prompts.
    struct SynthOnly {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for SynthOnly {
        fn name(&self) -> &'static str {
            "synth-only"
        }

        async fn complete(&self, request: &CompletionRequest) -> ProviderResult {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(request.prompt.clone());
            }
            if request.prompt.starts_with("Propose") {
                Err(crate::error::ProviderError::new(
                    "synth-only",
                    crate::error::ProviderErrorKind::Status(503),
                    "overloaded",
                ))
            } else {
                Ok("The notice period is 30 days [1].".to_string())
            }
        }
    }

    fn clauses() -> Vec<String> {
        [
            "Customer shall pay all invoices within thirty days.",
            "Either party may terminate this agreement upon 30 days written notice.",
            "Each party shall keep Confidential Information secret.",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    fn orchestrator(
        providers: Vec<Arc<dyn LlmProvider>>,
        posture: Posture,
        policy: RedlinePolicy,
    ) -> Orchestrator {
        let config = AgentConfig::builder()
            .posture(posture)
            .redline_policy(policy)
            .build()
            .unwrap_or_else(|_| unreachable!());
        let gateway = Arc::new(LlmGateway::new(providers, &config));
        Orchestrator::with_prompts(gateway, &config, PromptSet::defaults())
    }

    #[test]
    fn test_wants_proposal() {
        assert!(wants_proposal(Intent::Redline, "make it better"));
        assert!(wants_proposal(Intent::Qa, "What is the Liability cap?"));
        assert!(wants_proposal(Intent::Qa, "Any renewal terms?"));
        assert!(!wants_proposal(Intent::Qa, "When are invoices due?"));
    }

    #[tokio::test]
    async fn test_rejects_empty_and_oversized_query() {
        let orch = orchestrator(Vec::new(), Posture::Lenient, RedlinePolicy::Template);
        let empty = orch.run("  ", &clauses(), 3, None).await;
        assert!(matches!(empty, Err(AgentError::Orchestration { .. })));

        let long = "a".repeat(MAX_QUERY_LEN + 1);
        let oversized = orch.run(&long, &clauses(), 3, None).await;
        assert!(matches!(oversized, Err(AgentError::Orchestration { .. })));
    }

    #[tokio::test]
    async fn test_qa_demo_mode() {
        let orch = orchestrator(Vec::new(), Posture::Lenient, RedlinePolicy::Template);
        let result = orch
            .run("When must invoices be paid?", &clauses(), 2, None)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(result.intent, Intent::Qa);
        assert_eq!(
            result.steps,
            vec![Step::Classify, Step::Retrieve, Step::Synthesize]
        );
        assert_eq!(result.answer, MOCK_RESPONSE);
        assert_eq!(result.citations[0].index, 0);
        assert!(result.proposal.is_none());
    }

    #[tokio::test]
    async fn test_empty_clause_list_returns_sentinel() {
        let orch = orchestrator(Vec::new(), Posture::Strict, RedlinePolicy::Template);
        let result = orch
            .run("What is the termination notice period?", &[], 5, None)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(result.answer, NO_RELEVANT_CLAUSES);
        assert!(result.citations.is_empty());
        // "notice" triggers the template proposal, which needs no provider.
        assert!(result.proposal.is_some());
    }

    #[tokio::test]
    async fn test_synthesis_failure_propagates() {
        let orch = orchestrator(Vec::new(), Posture::Strict, RedlinePolicy::Template);
        let result = orch.run("When are invoices paid?", &clauses(), 2, None).await;
        assert!(matches!(result, Err(AgentError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_proposal_failure_is_captured() {
        let provider = Arc::new(SynthOnly {
            prompts: Mutex::new(Vec::new()),
        });
        let orch = orchestrator(
            vec![provider.clone()],
            Posture::Strict,
            RedlinePolicy::Drafted,
        );
        let result = orch
            .run("Rewrite the termination notice clause", &clauses(), 2, None)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(result.intent, Intent::Redline);
        assert_eq!(result.answer, "The notice period is 30 days [1].");
        let proposal = result.proposal.unwrap_or_default();
        assert!(proposal.starts_with("Error: "), "got {proposal}");
    }

    #[tokio::test]
    async fn test_synthesis_prompt_uses_retrieved_clauses_only() {
        let provider = Arc::new(SynthOnly {
            prompts: Mutex::new(Vec::new()),
        });
        let orch = orchestrator(
            vec![provider.clone()],
            Posture::Strict,
            RedlinePolicy::Template,
        );
        let _ = orch
            .run("terminate agreement", &clauses(), 1, None)
            .await
            .unwrap_or_else(|_| unreachable!());
        let prompts = provider.prompts.lock().map(|p| p.clone()).unwrap_or_default();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("[1] Either party may terminate"));
        assert!(!prompts[0].contains("Customer shall pay"));
    }

    #[tokio::test]
    async fn test_citations_carry_source_and_truncate() {
        let mut corpus = Corpus::new();
        corpus.add_document("msa.txt", "Fees are due monthly.\n\nLiability is capped.");
        let long_clause = format!("Renewal {}", "x ".repeat(400));
        corpus.add_document("order.txt", &long_clause);

        let orch = orchestrator(Vec::new(), Posture::Lenient, RedlinePolicy::Template);
        let result = orch
            .run_corpus("renewal", &corpus, 1)
            .await
            .unwrap_or_else(|_| unreachable!());

        let citation = &result.citations[0];
        assert_eq!(citation.index, 2);
        assert_eq!(citation.source.as_deref(), Some("order.txt"));
        assert!(citation.text.ends_with("..."));
        assert_eq!(
            citation.text.chars().count(),
            MAX_CITATION_CHARS + "...".len()
        );
        assert!(
            result
                .proposal
                .is_some_and(|p| p.starts_with("Renewal; Opt-Out."))
        );
    }
}
