//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise `default_level` applies.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
