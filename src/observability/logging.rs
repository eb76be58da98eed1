//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem for the host process
//! - Configure log level from config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - The library never installs a subscriber on its own

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install a global subscriber built from the observability settings.
///
/// Fails if a global subscriber is already set.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let (filter, rejected) = match EnvFilter::try_new(&config.log_level) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    if let Some(e) = rejected {
        tracing::warn!(log_level = %config.log_level, error = %e, "Invalid log level, using info");
    }
    Ok(())
}
