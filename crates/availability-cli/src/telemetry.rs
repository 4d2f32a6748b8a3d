//! Structured logging setup for the CLI.
//!
//! Logs go to stderr so stdout stays machine-readable JSON.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `directives`, or by `RUST_LOG` when
/// none are given. Defaults to `warn`. Does nothing if a subscriber is already set.
pub fn init_tracing(directives: Option<&str>) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter: '{}'", directives))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}
