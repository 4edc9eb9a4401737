//! # contract-copilot
//!
//! Clause-level question answering and review for contracts.
//!
//! Contract text is segmented into clauses, ranked against a question with
//! BM25 (keyword overlap as fallback), and answered by a language model that
//! may only use the retrieved clauses. Redline requests also get a safer
//! replacement clause. Single clauses can be scored for risk, mined for key
//! terms, and checked against regulatory frameworks, with typed results.
//!
//! Several providers (`OpenAI`, Groq, Gemini, Cohere) sit behind one gateway
//! that fails over in order. With no credentials the crate runs in demo
//! mode: deterministic placeholder answers and keyword heuristics.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use contract_copilot::agent::{AgentConfig, LlmGateway, Orchestrator};
//! use contract_copilot::core::segment;
//!
//! # async fn run() -> Result<(), contract_copilot::error::AgentError> {
//! let config = AgentConfig::from_env()?;
//! let gateway = Arc::new(LlmGateway::from_config(&config));
//! let orchestrator = Orchestrator::new(gateway, &config);
//!
//! let clauses = segment("1. Fees are due monthly.\n2. Either party may terminate on 30 days notice.");
//! let result = orchestrator
//!     .run("What is the termination notice period?", &clauses, config.top_k, None)
//!     .await?;
//! assert!(!result.citations.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod analysis;
pub mod cli;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod search;

pub use agent::{AgentConfig, AgentResult, LlmGateway, Orchestrator};
pub use analysis::ClauseAnalyzer;
pub use core::{Corpus, Intent, classify, segment};
pub use error::{Error, Result};
