//! Tracing setup shared by every LiftLog binary.
//!
//! Log lines go to stderr so they never interleave with the session
//! prompts, charts and lists the CLI prints on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Set up tracing at the `info` level. `RUST_LOG` overrides.
pub fn init() {
    init_with_level("info")
}

/// Set up tracing at a given default level (`debug`, `info`, `warn`,
/// `error`). `RUST_LOG` still takes precedence when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Test-only setup that routes logs through the test harness capture.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
