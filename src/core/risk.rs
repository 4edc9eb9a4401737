//! Risk level shared by structured analyses and report rendering.

use serde::{Deserialize, Serialize};

/// Risk level of a clause, ordered from highest to lowest.
///
/// Discriminants are inverted (`High = 0`) so the derived [`Ord`] sorts
/// the riskiest clauses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Needs immediate legal review.
    High = 0,
    /// Needs review against policy.
    Medium = 1,
    /// Standard terms.
    Low = 2,
}

impl RiskLevel {
    /// Parses a risk level (case-insensitive). Unknown values are `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
