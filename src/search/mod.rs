//! Clause retrieval.
//!
//! BM25 is the primary ranker; keyword overlap is the fallback used when
//! no index can be built or the index does not match the clause list.
//! BM25 may return zero-scored clauses to fill `k`; the overlap ranker
//! never does.

pub mod bm25;
pub mod overlap;

use serde::{Deserialize, Serialize};

pub use bm25::Bm25Index;

use crate::error::SearchError;

/// A clause index with its retrieval score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredClause {
    /// Index into the clause list.
    pub index: usize,
    /// Score on the scale of the method that produced it.
    pub score: f64,
}

/// Ranking method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
    /// Okapi BM25.
    #[default]
    Bm25,
    /// Count of shared query tokens.
    KeywordOverlap,
}

impl RetrievalMethod {
    /// Parses a method name (`bm25`, `keyword`, `overlap`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bm25" => Some(Self::Bm25),
            "keyword" | "overlap" | "keyword_overlap" => Some(Self::KeywordOverlap),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bm25 => "bm25",
            Self::KeywordOverlap => "keyword_overlap",
        }
    }
}

impl std::fmt::Display for RetrievalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a BM25 index, or `None` when `clauses` has nothing to index.
#[must_use]
pub fn build_index(clauses: &[String]) -> Option<Bm25Index> {
    Bm25Index::build(clauses)
}

/// Retrieves the top `k` clauses for `query`.
///
/// Uses `index` when present, keyword overlap otherwise. Results are in
/// descending score order; equal scores keep clause order.
///
/// # Errors
///
/// Returns [`SearchError::IndexMismatch`] if `index` was built over a
/// different number of clauses.
pub fn retrieve(
    query: &str,
    clauses: &[String],
    index: Option<&Bm25Index>,
    k: usize,
) -> Result<Vec<ScoredClause>, SearchError> {
    match index {
        Some(index) => index.search(query, clauses.len(), k),
        None => Ok(overlap::search(query, clauses, k)),
    }
}

/// Retrieves with `method`, degrading to keyword overlap if BM25 cannot be
/// used. Returns the results and the method that produced them.
#[must_use]
pub fn retrieve_with_fallback(
    query: &str,
    clauses: &[String],
    method: RetrievalMethod,
    k: usize,
) -> (Vec<ScoredClause>, RetrievalMethod) {
    if method == RetrievalMethod::Bm25 {
        if let Some(index) = build_index(clauses) {
            match retrieve(query, clauses, Some(&index), k) {
                Ok(results) => return (results, RetrievalMethod::Bm25),
                Err(e) => {
                    tracing::warn!(error = %e, "bm25 retrieval failed, using keyword overlap");
                }
            }
        } else if !clauses.is_empty() {
            tracing::warn!("no bm25 index for clauses, using keyword overlap");
        }
    }

    (
        overlap::search(query, clauses, k),
        RetrievalMethod::KeywordOverlap,
    )
}

/// Sorts scores descending (stable), keeps those passing `keep`, and
/// truncates to `k`.
pub(crate) fn rank(scores: Vec<f64>, k: usize, keep: impl Fn(f64) -> bool) -> Vec<ScoredClause> {
    let mut ranked: Vec<ScoredClause> = scores
        .into_iter()
        .enumerate()
        .filter(|(_, score)| keep(*score))
        .map(|(index, score)| ScoredClause { index, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}
