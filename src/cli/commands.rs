//! CLI command implementations.
//!
//! Each command resolves its input, builds what it needs from
//! [`AgentConfig`], and returns the rendered output as a string.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::agent::config::{AgentConfigBuilder, Posture, RedlinePolicy};
use crate::agent::prompt::{PromptSet, policy_lens_question};
use crate::agent::{AgentConfig, LlmGateway, Orchestrator};
use crate::analysis::{ClauseAnalyzer, Framework};
use crate::cli::output::{
    OutputFormat, SearchHit, format_compliance, format_metadata, format_result, format_risk,
    format_search, format_segments, render_report,
};
use crate::cli::parser::{ClauseInput, Cli, Commands, CorpusInput};
use crate::core::{Corpus, FileMap, classify, segment};
use crate::error::{CommandError, Result};
use crate::io::read_document;
use crate::search::{RetrievalMethod, retrieve_with_fallback};

/// Parameters for the `ask` command.
#[derive(Debug, Clone, Copy)]
pub struct AskParams<'a> {
    /// Question; `None` builds the policy-lens review question.
    pub query: Option<&'a str>,
    /// Contract input.
    pub corpus: &'a CorpusInput,
    /// Clauses to retrieve.
    pub top_k: Option<usize>,
    /// Framework names for the policy lens.
    pub frameworks: &'a [String],
    /// Redline policy name.
    pub redline: Option<&'a str>,
    /// Retrieval method name.
    pub method: Option<&'a str>,
    /// Prompt template directory.
    pub prompt_dir: Option<&'a Path>,
    /// Markdown report destination.
    pub export: Option<&'a Path>,
}

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an error if input cannot be read, configuration is invalid, or
/// the pipeline fails in strict posture.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Segment { input } => cmd_segment(input, format),
        Commands::Classify { query } => Ok(cmd_classify(query, format)),
        Commands::Search {
            query,
            corpus,
            top_k,
            method,
        } => cmd_search(cli, query, corpus, *top_k, method.as_deref(), format),
        Commands::Ask {
            query,
            corpus,
            top_k,
            frameworks,
            redline,
            method,
            prompt_dir,
            export,
        } => {
            let params = AskParams {
                query: query.as_deref(),
                corpus,
                top_k: *top_k,
                frameworks,
                redline: redline.as_deref(),
                method: method.as_deref(),
                prompt_dir: prompt_dir.as_deref(),
                export: export.as_deref(),
            };
            cmd_ask(cli, &params, format)
        }
        Commands::Risk { input } => cmd_risk(cli, input, format),
        Commands::Metadata { input } => cmd_metadata(cli, input, format),
        Commands::Compliance { input, frameworks } => {
            cmd_compliance(cli, input, frameworks, format)
        }
        Commands::Providers => cmd_providers(cli, format),
        Commands::InitPrompts { dir } => cmd_init_prompts(dir.as_deref(), format),
    }
}

// ==================== Input ====================

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CommandError::NoInput(format!("failed to read from stdin: {e}")))?;
    Ok(buf)
}

/// Resolves a single text from the argument, a file, or stdin.
fn read_clause_input(input: &ClauseInput) -> Result<String> {
    let text = match (&input.text, &input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_document(path),
        (None, None) => read_stdin()?,
    };
    if text.trim().is_empty() {
        return Err(CommandError::NoInput(
            "no text to analyze (pass it as an argument, with --file, or on stdin)".to_string(),
        )
        .into());
    }
    Ok(text)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.display().to_string(), ToString::to_string)
}

/// Segments the contract input. Files get a file map; inline or piped text
/// does not.
fn load_contract(input: &CorpusInput) -> Result<(Vec<String>, Option<FileMap>)> {
    let (clauses, file_map) = if input.files.is_empty() {
        let text = match &input.text {
            Some(text) => text.clone(),
            None => read_stdin()?,
        };
        (segment(&text), None)
    } else {
        let mut corpus = Corpus::new();
        for path in &input.files {
            let range = corpus.add_document(document_name(path), &read_document(path));
            if range.is_empty() {
                tracing::warn!(path = %path.display(), "document produced no clauses");
            }
        }
        let (clauses, file_map) = corpus.into_parts();
        (clauses, Some(file_map))
    };

    if clauses.is_empty() {
        return Err(CommandError::NoInput(
            "no clauses found (pass --file, --text, or pipe the contract on stdin)".to_string(),
        )
        .into());
    }
    Ok((clauses, file_map))
}

fn parse_frameworks(names: &[String]) -> Result<Vec<Framework>> {
    let mut frameworks = Vec::with_capacity(names.len());
    for name in names {
        let framework = Framework::parse(name).ok_or_else(|| {
            CommandError::InvalidArgument(format!(
                "unknown framework '{name}' (expected gdpr, ccpa, sox, hipaa, pci-dss)"
            ))
        })?;
        if !frameworks.contains(&framework) {
            frameworks.push(framework);
        }
    }
    Ok(frameworks)
}

fn parse_method(name: &str) -> Result<RetrievalMethod> {
    RetrievalMethod::parse(name).ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "unknown retrieval method '{name}' (expected bm25 or keyword)"
        ))
        .into()
    })
}

// ==================== Runtime & config ====================

/// Environment-backed builder with the global CLI overrides applied.
fn config_builder(cli: &Cli) -> AgentConfigBuilder {
    let mut builder = AgentConfig::builder();
    if cli.strict {
        builder = builder.posture(Posture::Strict);
    }
    if let Some(order) = &cli.providers {
        builder = builder.provider_order(order.clone());
    }
    builder.from_env()
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::Runtime(format!("failed to create async runtime: {e}")).into()
    })
}

fn demo_notice(gateway: &LlmGateway) -> &'static str {
    if gateway.is_configured() {
        ""
    } else {
        "\n(demo mode: no provider API key set, output is a placeholder)\n"
    }
}

// ==================== Commands ====================

fn cmd_segment(input: &ClauseInput, format: OutputFormat) -> Result<String> {
    let clauses = segment(&read_clause_input(input)?);
    Ok(match format {
        OutputFormat::Text => format_segments(&clauses),
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&clauses),
    })
}

fn cmd_classify(query: &str, format: OutputFormat) -> String {
    #[derive(Serialize)]
    struct Classification<'a> {
        intent: crate::core::Intent,
        steps: &'a [crate::core::Step],
    }

    let intent = classify(query);
    match format {
        OutputFormat::Text => {
            let steps: Vec<&str> = intent.steps().iter().map(|s| s.as_str()).collect();
            format!("Intent: {intent}\nSteps: {}\n", steps.join(" → "))
        }
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&Classification {
            intent,
            steps: intent.steps(),
        }),
    }
}

fn cmd_search(
    cli: &Cli,
    query: &str,
    corpus: &CorpusInput,
    top_k: Option<usize>,
    method: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut builder = config_builder(cli);
    if let Some(k) = top_k {
        builder = builder.top_k(k);
    }
    if let Some(name) = method {
        builder = builder.retrieval(parse_method(name)?);
    }
    let config = builder.build()?;

    let (clauses, file_map) = load_contract(corpus)?;
    let (results, used) = retrieve_with_fallback(query, &clauses, config.retrieval, config.top_k);

    let hits: Vec<SearchHit<'_>> = results
        .iter()
        .map(|r| SearchHit {
            index: r.index,
            score: r.score,
            source: file_map.as_ref().and_then(|m| m.source_of(r.index)),
            text: &clauses[r.index],
        })
        .collect();

    Ok(match format {
        OutputFormat::Text => format_search(query, used, &hits),
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&serde_json::json!({
            "query": query,
            "method": used,
            "count": hits.len(),
            "results": hits,
        })),
    })
}

fn cmd_ask(cli: &Cli, params: &AskParams<'_>, format: OutputFormat) -> Result<String> {
    let frameworks = parse_frameworks(params.frameworks)?;
    let query = params
        .query
        .map_or_else(|| policy_lens_question(&frameworks), ToString::to_string);

    let mut builder = config_builder(cli);
    if let Some(k) = params.top_k {
        builder = builder.top_k(k);
    }
    if let Some(name) = params.redline {
        let policy = RedlinePolicy::parse(name).ok_or_else(|| {
            CommandError::InvalidArgument(format!(
                "unknown redline policy '{name}' (expected template or drafted)"
            ))
        })?;
        builder = builder.redline_policy(policy);
    }
    if let Some(name) = params.method {
        builder = builder.retrieval(parse_method(name)?);
    }
    if let Some(dir) = params.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    let config = builder.build()?;

    let (clauses, file_map) = load_contract(params.corpus)?;

    let gateway = Arc::new(LlmGateway::from_config(&config));
    let notice = demo_notice(&gateway);
    let orchestrator = Orchestrator::new(gateway, &config);

    let rt = runtime()?;
    let result = rt.block_on(orchestrator.run(&query, &clauses, config.top_k, file_map.as_ref()))?;

    let mut exported = None;
    if let Some(path) = params.export {
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        std::fs::write(path, render_report(&result, &generated_at)).map_err(|e| {
            CommandError::Output(format!("failed to write report to {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "report exported");
        exported = Some(path);
    }

    Ok(match format {
        OutputFormat::Text => {
            let mut output = format_result(&result);
            output.push_str(notice);
            if let Some(path) = exported {
                output.push_str(&format!("\nReport written to {}\n", path.display()));
            }
            output
        }
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&result),
    })
}

/// Gateway-backed analyzer for the single-clause commands.
fn analyzer(cli: &Cli) -> Result<(ClauseAnalyzer, &'static str)> {
    let config = config_builder(cli).build()?;
    let gateway = Arc::new(LlmGateway::from_config(&config));
    let notice = demo_notice(&gateway);
    let prompts = PromptSet::load(config.prompt_dir.as_deref());
    Ok((ClauseAnalyzer::new(gateway, prompts), notice))
}

fn cmd_risk(cli: &Cli, input: &ClauseInput, format: OutputFormat) -> Result<String> {
    let clause = read_clause_input(input)?;
    let (analyzer, notice) = analyzer(cli)?;
    let risk = runtime()?.block_on(analyzer.analyze_risk(&clause))?;
    Ok(match format {
        OutputFormat::Text => format_risk(&risk) + notice,
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&risk),
    })
}

fn cmd_metadata(cli: &Cli, input: &ClauseInput, format: OutputFormat) -> Result<String> {
    let clause = read_clause_input(input)?;
    let (analyzer, notice) = analyzer(cli)?;
    let meta = runtime()?.block_on(analyzer.extract_metadata(&clause))?;
    Ok(match format {
        OutputFormat::Text => format_metadata(&meta) + notice,
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&meta),
    })
}

fn cmd_compliance(
    cli: &Cli,
    input: &ClauseInput,
    frameworks: &[String],
    format: OutputFormat,
) -> Result<String> {
    let frameworks = parse_frameworks(frameworks)?;
    let clause = read_clause_input(input)?;
    let (analyzer, notice) = analyzer(cli)?;
    let analysis = runtime()?.block_on(analyzer.analyze_compliance(&clause, &frameworks))?;
    Ok(match format {
        OutputFormat::Text => format_compliance(&analysis) + notice,
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&analysis),
    })
}

fn cmd_providers(cli: &Cli, format: OutputFormat) -> Result<String> {
    #[derive(Serialize)]
    struct ProviderStatus<'a> {
        name: &'static str,
        configured: bool,
        model: &'a str,
        key_var: &'static str,
    }

    let config = config_builder(cli).build()?;
    let statuses: Vec<ProviderStatus<'_>> = config
        .provider_order
        .iter()
        .map(|&kind| {
            let settings = config.provider(kind);
            ProviderStatus {
                name: kind.as_str(),
                configured: settings.api_key.is_some(),
                model: &settings.model,
                key_var: kind.key_var(),
            }
        })
        .collect();

    Ok(match format {
        OutputFormat::Text => {
            let mut output = format!(
                "Posture: {} | Demo mode: {}\n\nTry order:\n",
                config.posture.as_str(),
                if config.demo_mode() { "yes" } else { "no" }
            );
            for (n, status) in statuses.iter().enumerate() {
                let state = if status.configured {
                    "configured".to_string()
                } else {
                    format!("not configured (set {})", status.key_var)
                };
                output.push_str(&format!(
                    "  {}. {:<8} {:<24} {state}\n",
                    n + 1,
                    status.name,
                    status.model
                ));
            }
            output
        }
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&serde_json::json!({
            "posture": config.posture.as_str(),
            "demo_mode": config.demo_mode(),
            "providers": statuses,
        })),
    })
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            CommandError::InvalidArgument(
                "could not determine home directory; pass --dir".to_string(),
            )
        })?;

    let written = PromptSet::write_defaults(&target_dir)?;

    Ok(match format {
        OutputFormat::Text => {
            if written.is_empty() {
                format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                )
            } else {
                let mut output = format!(
                    "Wrote {} prompt template(s) to: {}\n",
                    written.len(),
                    target_dir.display()
                );
                for path in &written {
                    output.push_str(&format!(
                        "  {}\n",
                        path.file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("unknown")
                    ));
                }
                output.push_str(
                    "\nEdit these files and point COPILOT_PROMPT_DIR at the directory to use them.\n",
                );
                output
            }
        }
        OutputFormat::Json | OutputFormat::Ndjson => format.to_json(&serde_json::json!({
            "directory": target_dir.to_string_lossy(),
            "written": written.iter().map(|p| p.to_string_lossy().into_owned()).collect::<Vec<_>>(),
            "count": written.len(),
        })),
    })
}
