//! Typed schemas for structured model output.
//!
//! Field names match the JSON the prompts request, so a model response
//! decodes directly with serde. Enums reject values outside the schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::RiskLevel;

/// Value used for `jurisdiction` when none is stated.
pub const NOT_SPECIFIED: &str = "Not specified";

/// A structured response type the parser can decode and validate.
pub trait Structured: serde::de::DeserializeOwned {
    /// Schema name for error messages.
    const SCHEMA: &'static str;

    /// Range checks serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Category of a contract clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseType {
    /// Indemnification / hold harmless.
    Indemnification,
    /// Termination rights and notice.
    Termination,
    /// Confidentiality / non-disclosure.
    Confidentiality,
    /// Fees, invoicing and payment terms.
    Payment,
    /// Limitation of liability.
    Liability,
    /// Anything else.
    General,
}

impl ClauseType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indemnification => "indemnification",
            Self::Termination => "termination",
            Self::Confidentiality => "confidentiality",
            Self::Payment => "payment",
            Self::Liability => "liability",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ClauseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk assessment of a single clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    /// Overall risk.
    pub risk_level: RiskLevel,
    /// Confidence, 0-100.
    pub confidence: u32,
    /// Why the clause carries this risk.
    pub explanation: String,
    /// Specific risks identified.
    pub key_risks: Vec<String>,
    /// Recommended actions.
    pub recommendations: Vec<String>,
    /// Clause category.
    pub clause_type: ClauseType,
}

impl Structured for RiskAnalysis {
    const SCHEMA: &'static str = "risk analysis";

    fn validate(&self) -> Result<(), String> {
        if self.confidence > 100 {
            return Err(format!("confidence {} outside 0-100", self.confidence));
        }
        Ok(())
    }
}

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

/// Metadata extracted from a single clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataExtraction {
    /// Effective date as written.
    pub effective_date: Option<String>,
    /// Termination notice period (e.g. `"30 days"`).
    pub termination_notice: Option<String>,
    /// Total contract value.
    pub contract_value: Option<String>,
    /// Liability cap amount.
    pub liability_cap: Option<String>,
    /// Payment terms (e.g. `"Net 30"`).
    pub payment_terms: Option<String>,
    /// Clause category.
    pub clause_type: ClauseType,
    /// Party roles named in the clause.
    #[serde(default)]
    pub parties_mentioned: Vec<String>,
    /// Governing jurisdiction, or `"Not specified"`.
    #[serde(default = "not_specified")]
    pub jurisdiction: String,
}

impl Structured for MetadataExtraction {
    const SCHEMA: &'static str = "metadata extraction";
}

/// Regulatory framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Framework {
    /// General Data Protection Regulation.
    #[serde(rename = "GDPR")]
    Gdpr,
    /// California Consumer Privacy Act.
    #[serde(rename = "CCPA")]
    Ccpa,
    /// Sarbanes-Oxley Act.
    #[serde(rename = "SOX")]
    Sox,
    /// Health Insurance Portability and Accountability Act.
    #[serde(rename = "HIPAA")]
    Hipaa,
    /// Payment Card Industry Data Security Standard.
    #[serde(rename = "PCI-DSS")]
    PciDss,
}

impl Framework {
    /// All supported frameworks.
    pub const ALL: [Self; 5] = [Self::Gdpr, Self::Ccpa, Self::Sox, Self::Hipaa, Self::PciDss];

    /// Default selection when none is given.
    pub const DEFAULT: [Self; 2] = [Self::Gdpr, Self::Ccpa];

    /// Short name used as the JSON key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Ccpa => "CCPA",
            Self::Sox => "SOX",
            Self::Hipaa => "HIPAA",
            Self::PciDss => "PCI-DSS",
        }
    }

    /// Full name.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Gdpr => "General Data Protection Regulation",
            Self::Ccpa => "California Consumer Privacy Act",
            Self::Sox => "Sarbanes-Oxley Act",
            Self::Hipaa => "Health Insurance Portability and Accountability Act",
            Self::PciDss => "Payment Card Industry Data Security Standard",
        }
    }

    /// Parses a short name (case-insensitive; `PCI`, `PCI-DSS` and `PCI_DSS` accepted).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('_', "-").as_str() {
            "GDPR" => Some(Self::Gdpr),
            "CCPA" => Some(Self::Ccpa),
            "SOX" => Some(Self::Sox),
            "HIPAA" => Some(Self::Hipaa),
            "PCI" | "PCI-DSS" | "PCIDSS" => Some(Self::PciDss),
            _ => None,
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compliance verdict for one framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLevel {
    /// Meets all requirements.
    Compliant,
    /// Meets some requirements.
    Partial,
    /// Significant issues.
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl ComplianceLevel {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::Partial => "Partial",
            Self::NonCompliant => "Non-Compliant",
        }
    }
}

impl std::fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessment against one framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkAssessment {
    /// Verdict.
    pub compliance_level: ComplianceLevel,
    /// Gaps found.
    pub issues: Vec<String>,
    /// Recommended actions.
    pub recommendations: Vec<String>,
}

/// Compliance analysis across frameworks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAnalysis {
    /// Overall score, 0-100.
    pub overall_score: u32,
    /// Per-framework results keyed by short name.
    pub frameworks: BTreeMap<String, FrameworkAssessment>,
}

impl Structured for ComplianceAnalysis {
    const SCHEMA: &'static str = "compliance analysis";

    fn validate(&self) -> Result<(), String> {
        if self.overall_score > 100 {
            return Err(format!("overall_score {} outside 0-100", self.overall_score));
        }
        Ok(())
    }
}
