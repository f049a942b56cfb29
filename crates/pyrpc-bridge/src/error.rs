//! Bridge error types.
//!
//! Only setup can fail loudly. Runtime paths (dispatch, send) degrade to
//! outcomes and log lines instead of returning these.

use thiserror::Error;

use crate::domain::{ConfigError, LifecycleState};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry init failed: {0}")]
    Telemetry(String),

    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}
