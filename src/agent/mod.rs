//! Model-backed pipeline for contract questions.
//!
//! Wraps several LLM providers behind one gateway and runs a short,
//! fixed pipeline over segmented clauses.
//!
//! # Architecture
//!
//! ```text
//! User query → Orchestrator
//!   ├── classify (keyword intent)
//!   ├── retrieve (BM25, keyword-overlap fallback)
//!   ├── SynthesizerAgent → grounded answer with [n] citations
//!   └── RedlineProposer → safer clause (template or drafted)
//!
//! LlmGateway: provider 1 → provider 2 → … → strict error | mock text
//! ```

pub mod client;
pub mod config;
pub mod gateway;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod redline;
pub mod result;
pub mod synthesizer;
pub mod traits;

// Re-export key types
pub use config::{AgentConfig, Posture, ProviderKind, RedlinePolicy};
pub use gateway::{LlmGateway, MOCK_RESPONSE};
pub use message::{ChatMessage, Completion, CompletionRequest, CompletionSource, Role};
pub use orchestrator::Orchestrator;
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use redline::RedlineProposer;
pub use result::{AgentResult, Citation};
pub use synthesizer::{NO_RELEVANT_CLAUSES, SynthesizerAgent};
pub use traits::Agent;
