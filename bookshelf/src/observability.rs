//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Initialize JSON tracing output filtered by `service.log_level`
///
/// `RUST_LOG` is not consulted; set `BOOKSHELF_SERVICE__LOG_LEVEL` instead.
/// Calling this twice is harmless: the second subscriber is not installed.
///
/// # Errors
///
/// `InvalidConfig` when `service.log_level` is not a valid filter.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = &config.service.log_level;

    let filter = EnvFilter::try_new(log_level).map_err(|e| {
        Error::InvalidConfig(format!(
            "service.log_level '{}' is not a valid filter: {}",
            log_level, e
        ))
    })?;

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            service = %config.service.name,
            environment = %config.service.environment,
            "Tracing initialized"
        );
    }

    Ok(())
}
