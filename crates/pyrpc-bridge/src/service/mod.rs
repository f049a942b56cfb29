//! # PyRpc Bridge Service
//!
//! The single owning context object. The host creates one [`PyRpcBridge`],
//! drives it through [`PluginLifecycle`], feeds packets into
//! [`crate::PacketReceiver`] and hands `Arc<PyRpcBridge>` (or
//! `&dyn PyRpcApi`) to application code.
//!
//! ## Layout
//!
//! - `inbound`: packet receive and dispatch
//! - `outbound`: the `PyRpcApi` send path and listener management

mod inbound;
mod outbound;

use std::sync::Arc;

use parking_lot::RwLock;
use pyrpc_registry::{Handler, ListenerRegistry};
use tracing::{debug, info};

use crate::domain::{BridgeConfig, BridgeMetrics, LifecycleState, MetricsSnapshot};
use crate::error::BridgeError;
use crate::ports::inbound::PluginLifecycle;
use crate::ports::outbound::{SessionDirectory, SessionRef};

/// Handler type bound to PyRpc events; receives the sending session.
pub type SessionHandler = Handler<SessionRef>;

/// The PyRpc bridge.
pub struct PyRpcBridge {
    config: BridgeConfig,
    registry: ListenerRegistry<SessionRef>,
    directory: Arc<dyn SessionDirectory>,
    metrics: BridgeMetrics,
    state: RwLock<LifecycleState>,
}

impl PyRpcBridge {
    /// Create a bridge in the `Created` state.
    pub fn new(config: BridgeConfig, directory: Arc<dyn SessionDirectory>) -> Self {
        Self {
            config,
            registry: ListenerRegistry::new(),
            directory,
            metrics: BridgeMetrics::new(),
            state: RwLock::new(LifecycleState::Created),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    pub fn is_enabled(&self) -> bool {
        self.state() == LifecycleState::Enabled
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn registry(&self) -> &ListenerRegistry<SessionRef> {
        &self.registry
    }

    fn transition(&self, next: LifecycleState) -> Result<LifecycleState, BridgeError> {
        let mut state = self.state.write();
        let from = *state;
        if !from.can_transition_to(next) {
            return Err(BridgeError::InvalidTransition { from, to: next });
        }
        *state = next;
        debug!(%from, to = %next, "PyRpc bridge state changed");
        Ok(from)
    }
}

impl PluginLifecycle for PyRpcBridge {
    fn on_load(&self) -> Result<(), BridgeError> {
        self.config.validate()?;
        self.transition(LifecycleState::Loaded)?;
        info!(msg_id = self.config.msg_id, "PyRpc bridge loaded");
        Ok(())
    }

    fn on_enable(&self) -> Result<(), BridgeError> {
        self.transition(LifecycleState::Enabled)?;
        info!("PyRpc bridge enabled");
        Ok(())
    }

    fn on_disable(&self) -> Result<(), BridgeError> {
        self.transition(LifecycleState::Disabled)?;
        self.registry.clear();
        info!("PyRpc bridge disabled");
        Ok(())
    }
}
