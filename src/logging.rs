//! Tracing subscriber setup

use crate::config::LoggingConfig;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Filter directive in effect: `verbose` forces `debug`, otherwise
/// `RUST_LOG` wins over the configured level.
fn filter_directive(config: &LoggingConfig, verbose: bool, env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    env.filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let directive = filter_directive(
        config,
        verbose,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow!("Invalid log filter '{directive}': {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
