//! Shared helpers for integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a test-writer subscriber once per test binary.
///
/// Filtered by `RUST_LOG`, defaulting to `keyed_cursor=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyed_cursor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
