//! Logging setup
//!
//! All crates log through `tracing`; this installs the global subscriber.
//! `RUST_LOG` selects levels (default `info`).

use calcache_domain::{CalCacheError, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global `tracing` subscriber, as JSON lines or human-readable
/// text.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter()).with_target(true);

    let installed = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| CalCacheError::Internal(format!("tracing already initialised: {e}")))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
