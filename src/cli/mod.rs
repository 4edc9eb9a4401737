//! CLI layer for contract-copilot.
//!
//! Provides the command-line interface using clap. The CLI is a thin
//! caller of the library: it reads input, runs one operation, and renders
//! the returned structure.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::{OutputFormat, render_report};
pub use parser::{Cli, Commands};
