//! Diagnostic tracing for the grader.
//!
//! Stdout carries the grading output (`Program returned ...`, completion
//! messages). Tracing goes to stderr and is controlled by `RUST_LOG`, so it
//! never mixes with what the course tooling parses.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to `warn`. Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=grader=debug grader compare
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
