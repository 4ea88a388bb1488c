#![allow(dead_code)]

pub mod echo;
pub mod socket_guard;

use std::sync::Once;

/// Installs a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
