//! Tracing setup.
//!
//! The dashboard owns the terminal in raw mode, so the subscriber writes
//! to `keyline.log` in the working directory instead of stdout. `RUST_LOG`
//! takes precedence over the `--verbose` flag.

use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log file, appended to across sessions.
pub const LOG_FILE: &str = "keyline.log";

/// Install the global subscriber. Call once, before the terminal enters
/// raw mode.
pub fn init(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "keyline=debug" } else { "keyline=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let file = OpenOptions::new().create(true).append(true).open(LOG_FILE)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!("logging initialized (verbose={verbose})");
    Ok(())
}
