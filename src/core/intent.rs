//! Query intent classification and the pipeline steps each intent runs.

use serde::{Deserialize, Serialize};

/// Phrases that mark a request for a replacement clause.
const REDLINE_KEYWORDS: &[&str] = &[
    "improve",
    "rewrite",
    "redline",
    "safer clause",
    "propose",
    "better",
];

/// Phrases that mark a field-extraction request.
const EXTRACT_KEYWORDS: &[&str] = &["extract", "pull", "list", "show fields", "tracker", "find"];

/// What the user wants from a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Plain question answering.
    Qa,
    /// Pull structured fields out of clauses.
    Extract,
    /// Propose safer replacement language.
    Redline,
}

impl Intent {
    /// Pipeline steps recorded for this intent.
    #[must_use]
    pub const fn steps(self) -> &'static [Step] {
        match self {
            Self::Qa => &[Step::Classify, Step::Retrieve, Step::Synthesize],
            Self::Extract => &[Step::Classify, Step::Retrieve, Step::Extract],
            Self::Redline => &[
                Step::Classify,
                Step::Retrieve,
                Step::Synthesize,
                Step::Propose,
            ],
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qa => "qa",
            Self::Extract => "extract",
            Self::Redline => "redline",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named stage of the agent pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Intent classification.
    Classify,
    /// Clause retrieval.
    Retrieve,
    /// Answer synthesis.
    Synthesize,
    /// Field extraction.
    Extract,
    /// Redline proposal.
    Propose,
}

impl Step {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::Retrieve => "retrieve",
            Self::Synthesize => "synthesize",
            Self::Extract => "extract",
            Self::Propose => "propose",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a query by case-insensitive keyword match.
///
/// Redline keywords win over extract keywords; anything else is [`Intent::Qa`].
#[must_use]
pub fn classify(query: &str) -> Intent {
    let q = query.to_lowercase();
    if REDLINE_KEYWORDS.iter().any(|k| q.contains(k)) {
        Intent::Redline
    } else if EXTRACT_KEYWORDS.iter().any(|k| q.contains(k)) {
        Intent::Extract
    } else {
        Intent::Qa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Propose a safer indemnification clause", Intent::Redline; "propose")]
    #[test_case("Can you REWRITE the cap?", Intent::Redline; "uppercase rewrite")]
    #[test_case("Is there a better renewal term", Intent::Redline; "better")]
    #[test_case("Give me a safer clause for liability", Intent::Redline; "safer clause")]
    #[test_case("Extract the payment terms", Intent::Extract; "extract")]
    #[test_case("List all parties", Intent::Extract; "list")]
    #[test_case("Find the governing law", Intent::Extract; "find")]
    #[test_case("Show fields for the tracker", Intent::Extract; "tracker")]
    #[test_case("What is the termination notice period?", Intent::Qa; "question")]
    #[test_case("", Intent::Qa; "empty")]
    fn test_classify(query: &str, expected: Intent) {
        assert_eq!(classify(query), expected);
    }

    #[test]
    fn test_redline_beats_extract() {
        assert_eq!(classify("Find and improve the liability clause"), Intent::Redline);
    }

    #[test]
    fn test_steps_per_intent() {
        assert_eq!(
            Intent::Qa.steps(),
            &[Step::Classify, Step::Retrieve, Step::Synthesize]
        );
        assert_eq!(
            Intent::Extract.steps(),
            &[Step::Classify, Step::Retrieve, Step::Extract]
        );
        assert_eq!(Intent::Redline.steps().last(), Some(&Step::Propose));
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&Intent::Redline).unwrap_or_default();
        assert_eq!(json, "\"redline\"");
        let json = serde_json::to_string(&Step::Synthesize).unwrap_or_default();
        assert_eq!(json, "\"synthesize\"");
    }

    proptest! {
        #[test]
        fn prop_classify_is_pure(query in ".{0,80}") {
            prop_assert_eq!(classify(&query), classify(&query));
        }

        #[test]
        fn prop_classify_ignores_ascii_case(query in "[a-zA-Z ]{0,60}") {
            prop_assert_eq!(classify(&query), classify(&query.to_ascii_uppercase()));
        }
    }
}
