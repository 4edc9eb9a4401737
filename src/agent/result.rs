//! Data types returned by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::core::{Intent, Step};

/// A retrieved clause cited in an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Position of the clause in the clause list.
    pub index: usize,
    /// Retrieval score. BM25 and keyword-overlap scores are not comparable.
    pub score: f64,
    /// Clause snippet, at most 400 characters plus `...`.
    pub text: String,
    /// Source document, when a file map was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Final result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    /// Classified intent.
    pub intent: Intent,
    /// Steps executed, in order.
    pub steps: Vec<Step>,
    /// Clauses the answer was grounded on, best first.
    pub citations: Vec<Citation>,
    /// Synthesized answer.
    pub answer: String,
    /// Safer replacement clause, or an `Error: ...` string if drafting failed.
    pub proposal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_source_omitted_when_absent() {
        let citation = Citation {
            index: 2,
            score: 1.5,
            text: "Fees are due monthly.".to_string(),
            source: None,
        };
        let json = serde_json::to_string(&citation).unwrap_or_default();
        assert!(!json.contains("source"));
    }

    #[test]
    fn test_result_serializes_lowercase_labels() {
        let result = AgentResult {
            intent: Intent::Redline,
            steps: Intent::Redline.steps().to_vec(),
            citations: Vec::new(),
            answer: "a".to_string(),
            proposal: None,
        };
        let json = serde_json::to_value(&result).unwrap_or_default();
        assert_eq!(json["intent"], "redline");
        assert_eq!(json["steps"][3], "propose");
        assert!(json["proposal"].is_null());
    }
}
