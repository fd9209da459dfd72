//! Shared helpers for termrun's integration tests.

pub mod builders;
pub mod fake_terminal;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use termrun::logging::build_filter;
use tracing_subscriber::fmt;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary, filtered by
/// `RUST_LOG` (default `info`). Output only shows for failing tests unless
/// run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        fmt()
            .with_env_filter(build_filter(None, "RUST_LOG"))
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it takes longer than 5 seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
