use std::io;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with JSON formatting and environment-based filtering
///
/// - Uses `RUST_LOG` for level filtering (defaults to "info" if not set)
/// - Writes to stderr, stdout belongs to the dashboard
/// - Flattens event fields for cleaner log output
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // tokio-console replaces the normal subscriber entirely.
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}
