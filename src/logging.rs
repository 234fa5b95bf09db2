//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so they never interleave with the child's
//! echoed output on stdout.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Build the filter from an explicit directive, falling back to `RUST_LOG`
/// and then to `warn`.
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(directive: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
