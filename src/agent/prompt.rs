//! System prompts and template builders for agents.
//!
//! System prompts define each agent's role and, for structured analyses,
//! the exact JSON schema expected back. Template builders format the user
//! message from the query and retrieved clauses.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::analysis::schema::Framework;
use crate::core::Intent;

/// System prompt for the answer synthesizer.
pub const SYNTHESIZER_SYSTEM_PROMPT: &str = "You are a senior contract analyst. You answer \
questions strictly from the contract clauses you are given and cite them by their bracketed \
number. If the clauses do not answer the question, say so plainly.";

/// System prompt for the redline drafter.
pub const REDLINE_SYSTEM_PROMPT: &str = "You are a contracts attorney who drafts balanced, \
enforceable replacement language. You return only the clause text, with no commentary.";

/// System prompt for clause risk analysis.
pub const RISK_SYSTEM_PROMPT: &str = r#"You are an expert legal analyst specializing in contract risk assessment.
Analyze the contract clause you are given and respond with a single JSON object of this shape:

{
  "risk_level": "high" | "medium" | "low",
  "confidence": <integer 0-100>,
  "explanation": "why the clause carries this level of risk",
  "key_risks": ["risk", "..."],
  "recommendations": ["action", "..."],
  "clause_type": "indemnification" | "termination" | "confidentiality" | "payment" | "liability" | "general"
}

Risk levels:
- high: unlimited liability, broad indemnification, severe penalties
- medium: termination rights, payment terms, standard legal provisions needing policy review
- low: standard confidentiality, governing law or boilerplate

Be specific about what makes the clause risky and give actionable recommendations.
Return only the JSON object."#;

/// System prompt for clause metadata extraction.
pub const METADATA_SYSTEM_PROMPT: &str = r#"You are an expert contract analyst. Extract key metadata from the contract clause you are given and respond with a single JSON object of this shape:

{
  "effective_date": "January 15, 2024" | null,
  "termination_notice": "30 days" | null,
  "contract_value": "$500,000" | null,
  "liability_cap": "$100,000" | null,
  "payment_terms": "Net 30" | null,
  "clause_type": "indemnification" | "termination" | "confidentiality" | "payment" | "liability" | "general",
  "parties_mentioned": ["Client", "Provider"],
  "jurisdiction": "California" | "Not specified"
}

Only extract what the clause states explicitly; use null for anything missing.
Return only the JSON object."#;

/// System prompt for compliance analysis.
pub const COMPLIANCE_SYSTEM_PROMPT: &str = r#"You are an expert compliance analyst specializing in regulatory frameworks.
Assess the contract clause you are given against each requested framework and respond with a single JSON object of this shape:

{
  "overall_score": <integer 0-100>,
  "frameworks": {
    "<FRAMEWORK>": {
      "compliance_level": "Compliant" | "Partial" | "Non-Compliant",
      "issues": ["issue", "..."],
      "recommendations": ["action", "..."]
    }
  }
}

Compliance levels:
- Compliant: meets all requirements
- Partial: meets some requirements but has gaps
- Non-Compliant: significant compliance issues

Include one entry per requested framework, keyed by its short name.
Return only the JSON object."#;

/// Default prompt directory under the user's home.
const DEFAULT_PROMPT_DIR: &str = ".config/contract-copilot/prompts";

const SYNTHESIZER_FILENAME: &str = "synthesizer.md";
const REDLINE_FILENAME: &str = "redline.md";
const RISK_FILENAME: &str = "risk.md";
const METADATA_FILENAME: &str = "metadata.md";
const COMPLIANCE_FILENAME: &str = "compliance.md";

/// A set of system prompts for all agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// Answer synthesizer.
    pub synthesizer: String,
    /// Redline drafter.
    pub redline: String,
    /// Risk analysis.
    pub risk: String,
    /// Metadata extraction.
    pub metadata: String,
    /// Compliance analysis.
    pub compliance: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument
    /// 2. `COPILOT_PROMPT_DIR` environment variable
    /// 3. `~/.config/contract-copilot/prompts/`
    ///
    /// Each file is loaded independently; a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(PathBuf::from)
            .or_else(|| std::env::var("COPILOT_PROMPT_DIR").ok().map(PathBuf::from))
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(path).ok())
                .filter(|content| !content.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            synthesizer: load_file(SYNTHESIZER_FILENAME, SYNTHESIZER_SYSTEM_PROMPT),
            redline: load_file(REDLINE_FILENAME, REDLINE_SYSTEM_PROMPT),
            risk: load_file(RISK_FILENAME, RISK_SYSTEM_PROMPT),
            metadata: load_file(METADATA_FILENAME, METADATA_SYSTEM_PROMPT),
            compliance: load_file(COMPLIANCE_FILENAME, COMPLIANCE_SYSTEM_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            synthesizer: SYNTHESIZER_SYSTEM_PROMPT.to_string(),
            redline: REDLINE_SYSTEM_PROMPT.to_string(),
            risk: RISK_SYSTEM_PROMPT.to_string(),
            metadata: METADATA_SYSTEM_PROMPT.to_string(),
            compliance: COMPLIANCE_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (SYNTHESIZER_FILENAME, SYNTHESIZER_SYSTEM_PROMPT),
            (REDLINE_FILENAME, REDLINE_SYSTEM_PROMPT),
            (RISK_FILENAME, RISK_SYSTEM_PROMPT),
            (METADATA_FILENAME, METADATA_SYSTEM_PROMPT),
            (COMPLIANCE_FILENAME, COMPLIANCE_SYSTEM_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// A retrieved clause as shown to the model.
#[derive(Debug, Clone, Copy)]
pub struct PromptClause<'a> {
    /// Clause text.
    pub text: &'a str,
    /// Source document, when a file map is available.
    pub source: Option<&'a str>,
}

/// Builds the user message for the answer synthesizer.
///
/// Clauses are numbered from `[1]` in retrieval order.
#[must_use]
pub fn build_synthesis_prompt(query: &str, clauses: &[PromptClause<'_>], intent: Intent) -> String {
    let mut prompt = String::from(
        "Answer the user question using ONLY the provided clauses. Be concise (2-4 sentences) \
         and include short references like [1], [2] for every clause you rely on.",
    );
    if intent == Intent::Extract {
        prompt.push_str(
            " The user wants specific fields: list each requested field on its own line \
             with its value and reference, or state that it is not specified.",
        );
    }

    let _ = write!(prompt, "\n\nQuestion: {query}\n\nClauses:");
    for (i, clause) in clauses.iter().enumerate() {
        let _ = write!(prompt, "\n[{}]", i + 1);
        if let Some(source) = clause.source {
            let _ = write!(prompt, " (source: {source})");
        }
        let _ = writeln!(prompt, " {}", clause.text);
    }

    prompt
}

/// Builds the user message asking for one replacement clause.
#[must_use]
pub fn build_redline_prompt(clauses: &[&str]) -> String {
    let mut prompt = String::from(
        "Propose a single safer replacement for the contract language below. Emphasize \
         limitation of liability, add reasonable protections for our side, and keep the \
         wording clear and enforceable. Return one complete clause only.\n\nOriginal clauses:",
    );
    for (i, clause) in clauses.iter().enumerate() {
        let _ = writeln!(prompt, "\n[{}] {clause}", i + 1);
    }
    prompt
}

/// Builds the user message for risk analysis.
#[must_use]
pub fn build_risk_prompt(clause: &str) -> String {
    format!(
        "Analyze this contract clause for risk level:\n\n\"{clause}\"\n\n\
         Return only valid JSON with the specified structure."
    )
}

/// Builds the user message for metadata extraction.
#[must_use]
pub fn build_metadata_prompt(clause: &str) -> String {
    format!(
        "Extract metadata from this contract clause:\n\n\"{clause}\"\n\n\
         Return only valid JSON with the specified structure."
    )
}

/// Builds the user message for compliance analysis.
#[must_use]
pub fn build_compliance_prompt(clause: &str, frameworks: &[Framework]) -> String {
    let list = frameworks
        .iter()
        .map(|f| format!("{} ({})", f.name(), f.description()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Analyze this contract clause for compliance with these frameworks:\n\n\
         Frameworks: {list}\n\nClause: \"{clause}\"\n\n\
         Return only valid JSON with the specified structure."
    )
}

/// Default question asked when the user supplies none: a risk, compliance
/// and improvement review through the selected policy lens.
#[must_use]
pub fn policy_lens_question(frameworks: &[Framework]) -> String {
    let lens = if frameworks.is_empty() {
        "general contract best practices".to_string()
    } else {
        frameworks
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Analyze this contract for risk level and compliance with {lens}, \
         and suggest specific improvements to the riskiest clauses."
    )
}
