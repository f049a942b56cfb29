//! Logging setup.
//!
//! The host usually owns the global subscriber. Call [`init_logging`] only
//! when running the bridge standalone (tools, tests, embedded servers
//! without their own subscriber).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::LoggingConfig;
use crate::error::BridgeError;

/// Install a global `tracing` subscriber.
///
/// `config.level` is used as-is; environment overrides are applied earlier
/// by [`crate::BridgeConfig::with_env_overrides`].
///
/// # Errors
///
/// Returns [`BridgeError::Telemetry`] for an unparsable filter or when a
/// global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), BridgeError> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| BridgeError::Telemetry(e.to_string()))?;

    if config.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| BridgeError::Telemetry(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| BridgeError::Telemetry(e.to_string()))?;
    }

    tracing::info!(level = %config.level, json = config.json, "PyRpc bridge logging initialized");
    Ok(())
}
