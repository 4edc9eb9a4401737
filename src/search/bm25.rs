//! Okapi BM25 over lowercased word tokens, one document per clause.
//!
//! IDF uses the non-negative form `ln(1 + (N - df + 0.5) / (df + 0.5))` so
//! a term held by every clause contributes little but never subtracts.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::SearchError;

use super::{ScoredClause, rank};

/// Term-frequency saturation.
pub const K1: f64 = 1.5;
/// Length normalization strength.
pub const B: f64 = 0.75;

/// Lowercased Unicode words. Punctuation never lands in a token, so
/// `notice?` and `notice.` both match `notice`.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> {
    text.unicode_words().map(str::to_lowercase)
}

/// BM25 index built once per clause list.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<f64>,
    avg_doc_len: f64,
    idf: HashMap<String, f64>,
}

impl Bm25Index {
    /// Builds an index over `clauses`.
    ///
    /// Returns `None` when there is nothing to index (no clauses, or no
    /// tokens in any clause).
    #[must_use]
    pub fn build(clauses: &[String]) -> Option<Self> {
        if clauses.is_empty() {
            return None;
        }

        let mut term_freqs = Vec::with_capacity(clauses.len());
        let mut doc_lens = Vec::with_capacity(clauses.len());
        let mut doc_freq: HashMap<String, u32> = HashMap::new();

        for clause in clauses {
            let mut tf: HashMap<String, u32> = HashMap::new();
            let mut len = 0_u32;
            for token in tokenize(clause) {
                *tf.entry(token).or_insert(0) += 1;
                len += 1;
            }
            for term in tf.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(tf);
            doc_lens.push(f64::from(len));
        }

        let total: f64 = doc_lens.iter().sum();
        if total == 0.0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = clauses.len() as f64;
        let idf = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let df = f64::from(df);
                (term, ((n - df + 0.5) / (df + 0.5)).ln_1p())
            })
            .collect();

        Some(Self {
            term_freqs,
            doc_lens,
            avg_doc_len: total / n,
            idf,
        })
    }

    /// Number of clauses covered by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    /// Returns `true` if the index covers no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    /// BM25 score of every clause for `query`, in clause order.
    ///
    /// Repeated query tokens contribute once per occurrence.
    #[must_use]
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let mut scores = vec![0.0; self.len()];

        for token in tokenize(query) {
            let Some(&idf) = self.idf.get(&token) else {
                continue;
            };
            for (i, tf_map) in self.term_freqs.iter().enumerate() {
                let Some(&tf) = tf_map.get(&token) else {
                    continue;
                };
                let tf = f64::from(tf);
                let norm = 1.0 - B + B * self.doc_lens[i] / self.avg_doc_len;
                scores[i] += idf * (tf * (K1 + 1.0)) / (tf + K1 * norm);
            }
        }

        scores
    }

    /// Top `k` clauses by BM25 score, zero scores included.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IndexMismatch`] if `clause_count` differs from
    /// the number of clauses the index was built with.
    pub fn search(
        &self,
        query: &str,
        clause_count: usize,
        k: usize,
    ) -> Result<Vec<ScoredClause>, SearchError> {
        if clause_count != self.len() {
            return Err(SearchError::IndexMismatch {
                indexed: self.len(),
                given: clause_count,
            });
        }
        Ok(rank(self.scores(query), k, |_| true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_build_empty() {
        assert!(Bm25Index::build(&[]).is_none());
    }

    #[test]
    fn test_unique_term_ranks_first() {
        let docs = clauses(&[
            "payment is due monthly",
            "the supplier warrants the goods",
            "either party may terminate",
        ]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        let results = index
            .search("terminate", docs.len(), 3)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(results[0].index, 2);
        assert!(results[0].score > 0.0);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_case_insensitive() {
        let docs = clauses(&["Governing LAW is Delaware", "fees are fixed", "no assignment"]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        let scores = index.scores("law delaware");
        assert!(scores[0] > 0.0);
        assert!(scores[1].abs() < f64::EPSILON);
    }

    #[test]
    fn test_punctuation_does_not_split_terms() {
        let docs = clauses(&[
            "Fees are due within thirty (30) days.",
            "Termination requires written notice.",
            "Governed by the laws of Delaware.",
        ]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        let results = index
            .search("What notice is required for termination?", docs.len(), 3)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(results[0].index, 1);
        assert!(index.scores("30")[0] > 0.0);
    }

    #[test]
    fn test_shorter_document_scores_higher_for_same_tf() {
        let docs = clauses(&[
            "liability cap",
            "liability cap applies to all claims arising under this agreement in any year",
            "unrelated text here",
        ]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        let scores = index.scores("liability");
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_idf_non_negative() {
        let docs = clauses(&["the cap", "the fee"]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        assert!(index.scores("the").iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_mismatch_rejected() {
        let docs = clauses(&["one", "two"]);
        let index = Bm25Index::build(&docs).unwrap_or_else(|| unreachable!());
        let err = index.search("one", 3, 2);
        assert!(matches!(
            err,
            Err(SearchError::IndexMismatch {
                indexed: 2,
                given: 3
            })
        ));
    }
}
