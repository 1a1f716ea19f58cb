//! Logging initialization
//!
//! Sets up the tracing subscriber writing to stderr. The level comes
//! from `--log-level`, `--verbose`, or the `RUST_LOG` environment
//! variable, in that order of precedence.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool, log_level: Option<&str>) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let directive = log_level.unwrap_or(default_level);

    let filter = if log_level.is_none() && !verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    } else {
        EnvFilter::new(directive)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
