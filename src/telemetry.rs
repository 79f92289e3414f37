//! Telemetry
//!
//! Structured logging for client operations, configurable via `RUST_LOG`.

use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize tracing with the `RUST_LOG` filter (default `warn` so the
/// rendered Q&A output stays clean). Safe to call more than once.
pub fn init_tracing() {
    init_tracing_with_filter(&std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()));
}

/// Initialize tracing with an explicit filter (used by `--verbose`).
pub fn init_tracing_with_filter(filter: &str) {
    INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}
