//! Tracing setup for binaries and tests.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! caller's decision. These helpers install the same fmt subscriber the
//! binary uses, filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered by `RUST_LOG`, defaulting to `default_level`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}

/// Installs a subscriber that writes through the test harness so output is captured.
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}
