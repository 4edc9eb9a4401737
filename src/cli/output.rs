//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON. The markdown
//! report written by `ask --export` also lives here.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::AgentResult;
use crate::analysis::{ComplianceAnalysis, MetadataExtraction, RiskAnalysis};
use crate::core::truncate_graphemes;
use crate::search::RetrievalMethod;

/// Preview length for clause text in search listings.
const PREVIEW_CHARS: usize = 120;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Compact JSON on one line.
    Ndjson,
}

impl OutputFormat {
    /// Parses a format name; unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "ndjson" | "jsonl" => Self::Ndjson,
            _ => Self::Text,
        }
    }

    /// Serializes `value` in this format's JSON style.
    #[must_use]
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        let json = match self {
            Self::Ndjson => serde_json::to_string(value),
            Self::Text | Self::Json => serde_json::to_string_pretty(value),
        };
        let mut out = json.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
        out.push('\n');
        out
    }
}

/// Numbered clause listing.
#[must_use]
pub fn format_segments(clauses: &[String]) -> String {
    if clauses.is_empty() {
        return "No clauses found.\n".to_string();
    }
    let mut out = format!("{} clause(s)\n", clauses.len());
    for (i, clause) in clauses.iter().enumerate() {
        let _ = write!(out, "\n[{i}] {clause}\n");
    }
    out
}

/// A ranked clause for display.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    /// Position in the corpus.
    pub index: usize,
    /// Retrieval score.
    pub score: f64,
    /// Source document, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    /// Full clause text.
    pub text: &'a str,
}

/// Ranked search results.
#[must_use]
pub fn format_search(query: &str, method: RetrievalMethod, hits: &[SearchHit<'_>]) -> String {
    if hits.is_empty() {
        return format!("No clauses matched \"{query}\" ({method}).\n");
    }
    let mut out = format!("{} result(s) for \"{query}\" ({method})\n", hits.len());
    for (rank, hit) in hits.iter().enumerate() {
        let _ = write!(out, "\n{}. [{}] score {:.3}", rank + 1, hit.index, hit.score);
        if let Some(source) = hit.source {
            let _ = write!(out, " ({source})");
        }
        let _ = writeln!(out, "\n   {}", truncate_graphemes(hit.text, PREVIEW_CHARS));
    }
    out
}

/// Answer, citations and proposal as text.
#[must_use]
pub fn format_result(result: &AgentResult) -> String {
    let mut out = format!("{}\n", result.answer.trim());

    if !result.citations.is_empty() {
        out.push_str("\nCitations:\n");
        for (n, citation) in result.citations.iter().enumerate() {
            let _ = write!(
                out,
                "  [{}] clause {} (score {:.3})",
                n + 1,
                citation.index,
                citation.score
            );
            if let Some(source) = &citation.source {
                let _ = write!(out, " from {source}");
            }
            let _ = writeln!(out, ": {}", truncate_graphemes(&citation.text, PREVIEW_CHARS));
        }
    }

    if let Some(proposal) = &result.proposal {
        let _ = write!(out, "\nSafer clause proposal:\n{}\n", proposal.trim());
    }

    let steps: Vec<&str> = result.steps.iter().map(|s| s.as_str()).collect();
    let _ = write!(
        out,
        "\n---\nIntent: {} | Steps: {}\n",
        result.intent,
        steps.join(" → ")
    );
    out
}

fn bullet_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// Risk analysis as text.
#[must_use]
pub fn format_risk(risk: &RiskAnalysis) -> String {
    let mut out = format!(
        "Risk: {} (confidence {}%)\nClause type: {}\n\n{}\n\n",
        risk.risk_level.as_str().to_uppercase(),
        risk.confidence,
        risk.clause_type,
        risk.explanation
    );
    bullet_list(&mut out, "Key risks", &risk.key_risks);
    bullet_list(&mut out, "Recommendations", &risk.recommendations);
    out
}

/// Metadata as aligned text rows.
#[must_use]
pub fn format_metadata(meta: &MetadataExtraction) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let parties = if meta.parties_mentioned.is_empty() {
        "-".to_string()
    } else {
        meta.parties_mentioned.join(", ")
    };

    let rows = [
        ("Clause type", meta.clause_type.to_string()),
        ("Effective date", field(&meta.effective_date)),
        ("Termination notice", field(&meta.termination_notice)),
        ("Contract value", field(&meta.contract_value)),
        ("Liability cap", field(&meta.liability_cap)),
        ("Payment terms", field(&meta.payment_terms)),
        ("Parties", parties),
        ("Jurisdiction", meta.jurisdiction.clone()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<20}{value}");
    }
    out
}

/// Compliance analysis as text.
#[must_use]
pub fn format_compliance(analysis: &ComplianceAnalysis) -> String {
    let mut out = format!("Overall compliance score: {}/100\n", analysis.overall_score);
    for (name, assessment) in &analysis.frameworks {
        let _ = writeln!(out, "\n{name}: {}", assessment.compliance_level);
        bullet_list(&mut out, "Issues", &assessment.issues);
        bullet_list(&mut out, "Recommendations", &assessment.recommendations);
    }
    out
}

/// Renders the markdown analysis report.
///
/// `generated_at` is printed verbatim so callers control the clock.
#[must_use]
pub fn render_report(result: &AgentResult, generated_at: &str) -> String {
    let mut out = String::from("# Contract Analysis Report\n\n");

    let _ = write!(out, "## Answer\n\n{}\n\n", result.answer.trim());
    let _ = write!(out, "**Intent:** {}\n\n", result.intent);

    let steps: Vec<&str> = result.steps.iter().map(|s| s.as_str()).collect();
    let _ = write!(out, "**Pipeline steps:** {}\n\n", steps.join(" → "));

    out.push_str("## Citations\n\n");
    if result.citations.is_empty() {
        out.push_str("None\n\n");
    } else {
        for (n, citation) in result.citations.iter().enumerate() {
            let _ = write!(
                out,
                "{}. Clause {} (score: {:.3})",
                n + 1,
                citation.index,
                citation.score
            );
            if let Some(source) = &citation.source {
                let _ = write!(out, ", {source}");
            }
            let _ = write!(out, "\n\n   > {}\n\n", citation.text.replace('\n', " "));
        }
    }

    out.push_str("## Safer Clause Proposal\n\n");
    match result.proposal.as_deref().map(str::trim) {
        Some(proposal) if !proposal.is_empty() => {
            let _ = write!(out, "{proposal}\n\n");
        }
        _ => out.push_str("None provided\n\n"),
    }

    let _ = writeln!(out, "---\n\n*Generated {generated_at}*");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Citation;
    use crate::analysis::mock;
    use crate::core::Intent;

    fn result(proposal: Option<&str>) -> AgentResult {
        AgentResult {
            intent: Intent::Redline,
            steps: Intent::Redline.steps().to_vec(),
            citations: vec![Citation {
                index: 3,
                score: 2.5,
                text: "Vendor shall indemnify Customer.".to_string(),
                source: Some("msa.txt".to_string()),
            }],
            answer: "Vendor indemnifies Customer [1].".to_string(),
            proposal: proposal.map(ToString::to_string),
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("ndjson"), OutputFormat::Ndjson);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_ndjson_is_single_line() {
        let out = OutputFormat::Ndjson.to_json(&result(None));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_format_result_lists_citations_and_steps() {
        let out = format_result(&result(Some("Mutual Indemnification.")));
        assert!(out.contains("[1] clause 3 (score 2.500) from msa.txt"));
        assert!(out.contains("Safer clause proposal:\nMutual Indemnification."));
        assert!(out.contains("classify → retrieve → synthesize → propose"));
    }

    #[test]
    fn test_render_report() {
        let report = render_report(&result(Some("Mutual Indemnification.")), "2025-01-01 00:00 UTC");
        assert!(report.starts_with("# Contract Analysis Report"));
        assert!(report.contains("**Intent:** redline"));
        assert!(report.contains("1. Clause 3 (score: 2.500), msa.txt"));
        assert!(report.contains("Mutual Indemnification."));
        assert!(report.contains("*Generated 2025-01-01 00:00 UTC*"));
    }

    #[test]
    fn test_render_report_without_proposal() {
        let report = render_report(&result(None), "now");
        assert!(report.contains("## Safer Clause Proposal\n\nNone provided"));
    }

    #[test]
    fn test_format_metadata_placeholders() {
        let out = format_metadata(&mock::metadata("Nothing to see here."));
        assert!(out.contains("Liability cap       -"));
        assert!(out.contains("Jurisdiction        Not specified"));
    }

    #[test]
    fn test_format_search_empty() {
        let out = format_search("cap", RetrievalMethod::KeywordOverlap, &[]);
        assert_eq!(out, "No clauses matched \"cap\" (keyword_overlap).\n");
    }
}
