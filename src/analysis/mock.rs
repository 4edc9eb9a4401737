//! Deterministic keyword heuristics used when no model answer is usable.
//!
//! Each generator depends only on the clause text, so demo-mode output is
//! stable across runs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::schema::{
    ClauseType, ComplianceAnalysis, ComplianceLevel, Framework, FrameworkAssessment,
    MetadataExtraction, NOT_SPECIFIED, RiskAnalysis,
};
use crate::core::RiskLevel;

#[allow(clippy::expect_used)]
static NOTICE_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\)?\s*(?:\(\w+\)\s*)?(?:calendar\s+|business\s+)?days?\b")
        .expect("notice regex is valid")
});

#[allow(clippy::expect_used)]
static DOLLAR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|thousand|billion))?")
        .expect("amount regex is valid")
});

#[allow(clippy::expect_used)]
static NET_TERMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnet\s*(\d+)\b").expect("net terms regex is valid"));

#[allow(clippy::expect_used)]
static GOVERNING_LAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[Ll]aws\s+of\s+(?:the\s+)?(?:[Ss]tate\s+of\s+)?([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)")
        .expect("governing law regex is valid")
});

#[allow(clippy::expect_used)]
static LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}",
    )
    .expect("date regex is valid")
});

#[allow(clippy::expect_used)]
static PARTY_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(Client|Customer|Provider|Vendor|Supplier|Licensor|Licensee|Contractor|Company|Buyer|Seller)s?\b",
    )
    .expect("party regex is valid")
});

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Clause category from keywords (expects lowercased text).
#[must_use]
pub fn clause_type(lower: &str) -> ClauseType {
    if lower.contains("indemnif") {
        ClauseType::Indemnification
    } else if lower.contains("terminat") {
        ClauseType::Termination
    } else if lower.contains("liabilit") {
        ClauseType::Liability
    } else if contains_any(lower, &["payment", "invoice", "fees"]) {
        ClauseType::Payment
    } else if lower.contains("confidential") {
        ClauseType::Confidentiality
    } else {
        ClauseType::General
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Keyword risk assessment.
#[must_use]
pub fn risk(clause: &str) -> RiskAnalysis {
    let lower = clause.to_lowercase();

    if contains_any(&lower, &["indemnif", "unlimited"]) {
        RiskAnalysis {
            risk_level: RiskLevel::High,
            confidence: 90,
            explanation: "Clause contains broad indemnification or unlimited liability \
                          language that could expose the company to significant financial risk."
                .to_string(),
            key_risks: strings(&[
                "Unlimited liability exposure",
                "Broad indemnification scope",
                "Potential for significant financial loss",
            ]),
            recommendations: strings(&[
                "Add liability caps",
                "Limit indemnification scope",
                "Include mutual indemnification",
            ]),
            clause_type: ClauseType::Indemnification,
        }
    } else if contains_any(&lower, &["terminat", "payment"]) {
        let clause_type = if lower.contains("terminat") {
            ClauseType::Termination
        } else {
            ClauseType::Payment
        };
        RiskAnalysis {
            risk_level: RiskLevel::Medium,
            confidence: 80,
            explanation: "Clause contains termination or payment terms that require \
                          careful review of obligations and deadlines."
                .to_string(),
            key_risks: strings(&["Unclear termination conditions", "Payment timing risks"]),
            recommendations: strings(&[
                "Clarify termination procedures",
                "Define payment schedules clearly",
            ]),
            clause_type,
        }
    } else {
        let clause_type = if lower.contains("confidential") {
            ClauseType::Confidentiality
        } else {
            ClauseType::General
        };
        RiskAnalysis {
            risk_level: RiskLevel::Low,
            confidence: 70,
            explanation: "Clause appears to contain standard contractual language with \
                          limited risk exposure."
                .to_string(),
            key_risks: strings(&["Minor compliance considerations"]),
            recommendations: strings(&["Standard review recommended"]),
            clause_type,
        }
    }
}

/// Regex metadata extraction.
#[must_use]
pub fn metadata(clause: &str) -> MetadataExtraction {
    let lower = clause.to_lowercase();

    let termination_notice = contains_any(&lower, &["notice", "terminat"])
        .then(|| NOTICE_DAYS.captures(clause))
        .flatten()
        .map(|c| format!("{} days", &c[1]));

    let amount = DOLLAR_AMOUNT.find(clause).map(|m| m.as_str().to_string());
    let (liability_cap, contract_value) = if lower.contains("liabilit") {
        (amount, None)
    } else {
        (None, amount)
    };

    let payment_terms = NET_TERMS.captures(clause).map(|c| format!("Net {}", &c[1]));

    let jurisdiction = GOVERNING_LAW
        .captures(clause)
        .map_or_else(|| NOT_SPECIFIED.to_string(), |c| c[1].to_string());

    let effective_date = LONG_DATE.find(clause).map(|m| m.as_str().to_string());

    let mut parties_mentioned: Vec<String> = Vec::new();
    for capture in PARTY_ROLE.captures_iter(clause) {
        let role = &capture[1];
        if !parties_mentioned.iter().any(|p| p == role) {
            parties_mentioned.push(role.to_string());
        }
    }

    MetadataExtraction {
        effective_date,
        termination_notice,
        contract_value,
        liability_cap,
        payment_terms,
        clause_type: clause_type(&lower),
        parties_mentioned,
        jurisdiction,
    }
}

/// Keyword compliance assessment.
#[must_use]
pub fn compliance(clause: &str, frameworks: &[Framework]) -> ComplianceAnalysis {
    let lower = clause.to_lowercase();

    let flagged = |triggered: bool, issue: &str, recommendation: &str| {
        if triggered {
            FrameworkAssessment {
                compliance_level: ComplianceLevel::Partial,
                issues: vec![issue.to_string()],
                recommendations: vec![recommendation.to_string()],
            }
        } else {
            FrameworkAssessment {
                compliance_level: ComplianceLevel::Compliant,
                issues: Vec::new(),
                recommendations: Vec::new(),
            }
        }
    };

    let frameworks = frameworks
        .iter()
        .map(|&framework| {
            let assessment = match framework {
                Framework::Gdpr => flagged(
                    contains_any(&lower, &["personal data", "privacy"]),
                    "Data processing terms may need GDPR alignment",
                    "Add GDPR-compliant data processing clauses",
                ),
                Framework::Ccpa => flagged(
                    contains_any(&lower, &["california", "consumer"]),
                    "Consumer privacy rights may need clarification",
                    "Include CCPA consumer rights provisions",
                ),
                Framework::Sox | Framework::Hipaa | Framework::PciDss => FrameworkAssessment {
                    compliance_level: ComplianceLevel::Partial,
                    issues: vec!["Standard compliance review required".to_string()],
                    recommendations: vec!["Consult compliance team".to_string()],
                },
            };
            (framework.name().to_string(), assessment)
        })
        .collect::<BTreeMap<_, _>>();

    ComplianceAnalysis {
        overall_score: 75,
        frameworks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Vendor shall indemnify Client against all claims.", RiskLevel::High, ClauseType::Indemnification ; "indemnification")]
    #[test_case("Liability under this Agreement is unlimited.", RiskLevel::High, ClauseType::Indemnification ; "unlimited")]
    #[test_case("Either party may terminate on notice.", RiskLevel::Medium, ClauseType::Termination ; "termination")]
    #[test_case("Payment is due within 30 days.", RiskLevel::Medium, ClauseType::Payment ; "payment")]
    #[test_case("Each party keeps the other's information confidential.", RiskLevel::Low, ClauseType::Confidentiality ; "confidentiality")]
    #[test_case("This Agreement is written in English.", RiskLevel::Low, ClauseType::General ; "general")]
    fn test_mock_risk(clause: &str, level: RiskLevel, clause_type: ClauseType) {
        let risk = risk(clause);
        assert_eq!(risk.risk_level, level);
        assert_eq!(risk.clause_type, clause_type);
    }

    #[test]
    fn test_mock_risk_confidence() {
        assert_eq!(risk("indemnify").confidence, 90);
        assert_eq!(risk("payment").confidence, 80);
        assert_eq!(risk("hello").confidence, 70);
    }

    #[test]
    fn test_mock_risk_is_deterministic() {
        let clause = "Customer may terminate for convenience.";
        assert_eq!(risk(clause), risk(clause));
    }

    #[test]
    fn test_mock_metadata_notice_and_law() {
        let meta = metadata(
            "Either party may terminate this Agreement upon thirty (30) days written notice. \
             This Agreement is governed by the laws of the State of New York.",
        );
        assert_eq!(meta.termination_notice.as_deref(), Some("30 days"));
        assert_eq!(meta.jurisdiction, "New York");
        assert_eq!(meta.clause_type, ClauseType::Termination);
    }

    #[test]
    fn test_mock_metadata_amounts() {
        let cap = metadata("Provider's total liability shall not exceed $500,000.");
        assert_eq!(cap.liability_cap.as_deref(), Some("$500,000"));
        assert_eq!(cap.contract_value, None);

        let value = metadata("Customer shall pay fees of $1.2 million, Net 45.");
        assert_eq!(value.contract_value.as_deref(), Some("$1.2 million"));
        assert_eq!(value.payment_terms.as_deref(), Some("Net 45"));
        assert_eq!(value.liability_cap, None);
    }

    #[test]
    fn test_mock_metadata_parties_and_defaults() {
        let meta = metadata("The Vendor shall deliver to Customer. Vendor warrants the work.");
        assert_eq!(meta.parties_mentioned, vec!["Vendor", "Customer"]);
        assert_eq!(meta.jurisdiction, NOT_SPECIFIED);
        assert_eq!(meta.effective_date, None);
    }

    #[test]
    fn test_mock_metadata_effective_date() {
        let meta = metadata("This Agreement is effective as of January 5, 2024.");
        assert_eq!(meta.effective_date.as_deref(), Some("January 5, 2024"));
    }

    #[test]
    fn test_mock_compliance() {
        let result = compliance(
            "Provider processes personal data on behalf of Customer.",
            &Framework::ALL,
        );
        assert_eq!(result.overall_score, 75);
        assert_eq!(result.frameworks.len(), 5);
        assert_eq!(
            result.frameworks["GDPR"].compliance_level,
            ComplianceLevel::Partial
        );
        assert_eq!(
            result.frameworks["CCPA"].compliance_level,
            ComplianceLevel::Compliant
        );
        assert_eq!(
            result.frameworks["SOX"].issues,
            vec!["Standard compliance review required"]
        );
    }

    #[test]
    fn test_mock_compliance_only_requested_frameworks() {
        let result = compliance("California consumers may opt out.", &[Framework::Ccpa]);
        assert_eq!(result.frameworks.len(), 1);
        assert_eq!(
            result.frameworks["CCPA"].compliance_level,
            ComplianceLevel::Partial
        );
    }
}
