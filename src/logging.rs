//! Diagnostic output on stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "GITREE_LOG";

/// Default level for a `-v` count: none is `warn`, then `info`, `debug`
/// and `trace`.
#[must_use]
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter: `GITREE_LOG` when set and valid, otherwise the
/// level implied by `verbosity`.
#[must_use]
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)))
}

/// Installs the global subscriber. Later calls are no-ops, so tests and
/// repeated `run` invocations can share a process.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
