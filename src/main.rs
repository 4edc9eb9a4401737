//! contract-copilot command-line entry point.

use anyhow::Context;
use clap::Parser;

use contract_copilot::cli::{Cli, OutputFormat, execute};
use contract_copilot::logging::{self, LogFormat};

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_format = match OutputFormat::parse(&cli.format) {
        OutputFormat::Text => LogFormat::Text,
        OutputFormat::Json | OutputFormat::Ndjson => LogFormat::Json,
    };
    logging::init(cli.verbose, log_format);

    let output = execute(&cli).context("contract-copilot failed")?;
    print!("{output}");
    Ok(())
}
