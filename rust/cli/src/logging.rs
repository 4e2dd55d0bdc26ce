//! Tracing subscriber setup for the `besigue` binary.
//!
//! Logs go to stderr so they never mix with command output on stdout. The
//! filter defaults to `warn` and can be overridden with `RUST_LOG`, e.g.
//! `RUST_LOG=besigue_engine=debug besigue sim --games 1`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is harmless; the second
/// call keeps the first subscriber.
pub fn init() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
