use crate::error::{HarvestError, Result};
use tracing_subscriber::EnvFilter;

/// Initializes the application's logging system with the specified log level
///
/// `RUST_LOG` takes precedence over the configured level when set.
/// Valid log levels are: error, warn, info, debug, trace
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HarvestError::Config(format!("failed to install subscriber: {e}")))
}
