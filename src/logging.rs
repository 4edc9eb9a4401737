//! Subscriber setup for the binary.
//!
//! Log lines go to stderr so stdout stays clean for command output. The
//! filter comes from `COPILOT_LOG` (standard `EnvFilter` directives).

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "COPILOT_LOG";

/// Log line encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Default level: `info` when verbose, `warn` otherwise.
#[must_use]
pub const fn default_level(verbose: bool) -> Level {
    if verbose { Level::INFO } else { Level::WARN }
}

/// Installs the global subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    };

    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), Level::INFO);
        assert_eq!(default_level(false), Level::WARN);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, LogFormat::Text);
        init(true, LogFormat::Json);
    }
}
