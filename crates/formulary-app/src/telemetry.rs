//! Structured logging setup for hosts embedding the controller.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=formulary=trace` - Show trace for formulary crates only
/// - Default: INFO level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,formulary=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
