//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// contract-copilot: clause-level contract review with LLM providers.
///
/// Segments contracts into clauses, retrieves the ones relevant to a
/// question, and answers from them. Runs in demo mode (deterministic
/// placeholder output) when no provider API key is set.
#[derive(Parser, Debug)]
#[command(name = "contract-copilot")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (info-level logs on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, ndjson).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Fail when no provider answers instead of returning demo output.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Provider try order, comma-separated (groq,gemini,openai,cohere).
    #[arg(long, global = true)]
    pub providers: Option<String>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where a single clause or document comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct ClauseInput {
    /// Text to analyze. Reads `--file` or stdin when omitted.
    pub text: Option<String>,

    /// Read the text from a file (.txt, .md, .pdf).
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

/// Where the contract corpus for a query comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusInput {
    /// Contract file (.txt, .md, .pdf). Repeat to merge several documents.
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// Contract text given inline instead of files or stdin.
    #[arg(long, conflicts_with = "files")]
    pub text: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split contract text into clauses.
    #[command(after_help = r#"Examples:
  contract-copilot segment --file msa.txt
  cat msa.txt | contract-copilot segment
  contract-copilot --format json segment --file msa.pdf | jq length
"#)]
    Segment {
        /// Input text or file.
        #[command(flatten)]
        input: ClauseInput,
    },

    /// Show the intent and pipeline steps a query would run.
    #[command(after_help = r#"Examples:
  contract-copilot classify "What is the notice period?"      # qa
  contract-copilot classify "Extract the renewal terms"        # extract
  contract-copilot classify "Propose a safer liability clause" # redline
"#)]
    Classify {
        /// Query text.
        query: String,
    },

    /// Rank clauses against a query without calling a model.
    #[command(after_help = r#"Examples:
  contract-copilot search "termination notice" --file msa.txt
  contract-copilot search "liability cap" -f msa.txt -f order.pdf -k 3
  contract-copilot search "payment" --method keyword --file msa.txt
"#)]
    Search {
        /// Query text.
        query: String,

        /// Contract input.
        #[command(flatten)]
        corpus: CorpusInput,

        /// Maximum number of results.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Ranking method: bm25, keyword.
        #[arg(short, long)]
        method: Option<String>,
    },

    /// Answer a question from the contract's clauses.
    ///
    /// Without a question, runs a risk and compliance review through the
    /// selected frameworks.
    #[command(after_help = r#"Examples:
  contract-copilot ask "What is the termination notice period?" --file msa.txt
  contract-copilot ask "Propose a safer indemnification clause" --file msa.txt
  contract-copilot ask --framework gdpr --framework ccpa --file msa.txt
  contract-copilot ask "Who pays for audits?" -f msa.txt --export report.md
  contract-copilot --strict --providers groq,openai ask "Any auto-renewal?" -f msa.txt
"#)]
    Ask {
        /// Question. Defaults to a review question built from `--framework`.
        query: Option<String>,

        /// Contract input.
        #[command(flatten)]
        corpus: CorpusInput,

        /// Number of clauses to retrieve.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Policy lens for the default question (gdpr, ccpa, sox, hipaa, pci-dss).
        #[arg(long = "framework")]
        frameworks: Vec<String>,

        /// Redline policy: template, drafted.
        #[arg(long)]
        redline: Option<String>,

        /// Ranking method: bm25, keyword.
        #[arg(short, long)]
        method: Option<String>,

        /// Directory with custom prompt templates.
        #[arg(long, env = "COPILOT_PROMPT_DIR")]
        prompt_dir: Option<PathBuf>,

        /// Also write a markdown report to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Classify the risk of a single clause.
    #[command(after_help = r#"Examples:
  contract-copilot risk "The Client shall indemnify the Provider against all claims."
  contract-copilot --format json risk --file clause.txt
"#)]
    Risk {
        /// Clause input.
        #[command(flatten)]
        input: ClauseInput,
    },

    /// Extract key terms (dates, amounts, notice, law) from a clause.
    #[command(after_help = r#"Examples:
  contract-copilot metadata "Payment is due Net 30. Governed by the laws of the State of New York."
"#)]
    Metadata {
        /// Clause input.
        #[command(flatten)]
        input: ClauseInput,
    },

    /// Check a clause against regulatory frameworks.
    #[command(after_help = r#"Examples:
  contract-copilot compliance "Provider processes personal data on behalf of Customer."
  contract-copilot compliance --file dpa.txt --framework gdpr --framework hipaa
"#)]
    Compliance {
        /// Clause input.
        #[command(flatten)]
        input: ClauseInput,

        /// Frameworks to check (default: gdpr, ccpa).
        #[arg(long = "framework")]
        frameworks: Vec<String>,
    },

    /// Show which providers are configured and their try order.
    Providers,

    /// Write the default prompt templates for customization.
    #[command(after_help = r#"Examples:
  contract-copilot init-prompts                   # ~/.config/contract-copilot/prompts
  contract-copilot init-prompts --dir ./prompts   # custom location
"#)]
    InitPrompts {
        /// Target directory.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
