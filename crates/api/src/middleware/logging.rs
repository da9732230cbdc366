//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Initializes the global tracing subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from the config.
/// Output is JSON when `logging.format` is "json", human-readable otherwise.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
