//! Stderr logging for the CLI.
//!
//! The core logs through the `log` facade. The subscriber installed here
//! bridges those records into a `tracing_subscriber` fmt layer on stderr.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Filter for the `--verbose` flag.
///
/// Verbose runs log at `debug`. Otherwise `RUST_LOG` is honored, falling back
/// to `warn`.
pub fn filter_for(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber.
pub fn init(verbose: bool) -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time();
    Registry::default()
        .with(filter_for(verbose))
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Errors from installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("logging has already been initialised")]
    AlreadyInitialised,
    #[error("failed to install log subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}
