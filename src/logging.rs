//! Tracing subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "marketlens=info";

/// Install a global subscriber writing to stderr.
///
/// stdout is left for program output (log lines and the report).
/// `verbose` lowers the default filter to debug.
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let default = if verbose { "marketlens=debug" } else { DEFAULT_FILTER };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
}
