//! Keyword-overlap scoring, used when no BM25 index is available.

use std::collections::HashSet;

use super::bm25::tokenize;
use super::{ScoredClause, rank};

/// Top `k` clauses by the number of query tokens present in each clause.
///
/// Repeated query tokens count once per occurrence. Clauses sharing no
/// token with the query are never returned.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn search(query: &str, clauses: &[String], k: usize) -> Vec<ScoredClause> {
    let query_tokens: Vec<String> = tokenize(query).collect();

    let scores = clauses
        .iter()
        .map(|clause| {
            let vocab: HashSet<String> = tokenize(clause).collect();
            query_tokens.iter().filter(|t| vocab.contains(*t)).count() as f64
        })
        .collect();

    rank(scores, k, |score| score > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_counts_query_tokens() {
        let docs = clauses(&["notice period is thirty days", "payment in thirty days", "none"]);
        let results = search("thirty days notice", &docs, 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 0);
        assert!((results[0].score - 3.0).abs() < f64::EPSILON);
        assert!((results[1].score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_query_tokens_count_twice() {
        let docs = clauses(&["fees fees fees", "other"]);
        let results = search("fees fees", &docs, 5);
        assert!((results[0].score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trailing_punctuation_ignored() {
        let docs = clauses(&["Payment is due on receipt.", "Notice must be in writing."]);
        let results = search("notice?", &docs, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
    }

    #[test]
    fn test_zero_scores_excluded() {
        let docs = clauses(&["alpha", "beta"]);
        assert!(search("gamma", &docs, 5).is_empty());
    }

    #[test]
    fn test_ties_keep_clause_order() {
        let docs = clauses(&["x fee", "y fee", "z fee"]);
        let results = search("fee", &docs, 2);
        let order: Vec<_> = results.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1]);
    }
}
