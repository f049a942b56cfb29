//! # PyRpc Bridge
//!
//! Connects a game server to PyRpc-capable clients over one reserved
//! message-type channel.
//!
//! ## Architecture Role
//!
//! ```text
//!            host transport                         application code
//!                 │                                        │
//!   PyRpcPacket   ↓  on_packet_receive()     listen_for_event() / notify_*()
//!          ┌──────┴────────────────────────────────────────┴──────┐
//!          │                     PyRpcBridge                      │
//!          │  decode ─► EventKey ─► snapshot ─► invoke isolated   │
//!          │  encode once ─► PyRpcPacket ─► every eligible target │
//!          └──────┬─────────────────────────────────────┬─────────┘
//!                 ↓ SessionDirectory                    ↓ ClientSession
//!           (who is where)                      (send_packet, identity)
//! ```
//!
//! The crate follows the hexagonal layout:
//! - **domain**: configuration, geometry, metrics, outcome types
//! - **ports**: the inbound API and the outbound host traits
//! - **service**: [`PyRpcBridge`], the single owning context object
//!
//! ## Failure Model
//!
//! Nothing here is fatal to the host. Malformed packets are dropped,
//! encode failures make a send report `false`/`0`, faulty handlers are
//! isolated and logged, and ineligible targets are skipped silently.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod telemetry;

pub use domain::{
    BridgeConfig, BridgeMetrics, BroadcastScope, ConfigError, DimensionId, DispatchOutcome,
    DispatchReport, IgnoreReason, LifecycleState, LoggingConfig, MetricsSnapshot, Position,
    SendOutcome, WorldId,
};
pub use error::BridgeError;
pub use ports::inbound::{PacketReceiver, PluginLifecycle, PyRpcApi, Recipients};
pub use ports::outbound::{ClientSession, PyRpcPacket, SessionDirectory, SessionId, SessionRef};
pub use service::{PyRpcBridge, SessionHandler};

pub use pyrpc_codec::{EventKey, NativeValue, Payload};

/// Reserved host message-type id carrying PyRpc traffic.
pub const PYRPC_MSG_ID: u64 = 9_753_608;

/// Sentinel entity id meaning "the receiving client's own identity".
///
/// Only meaningful in single-target sends. Nothing validates its use in
/// multi-target sends; there it is an ordinary integer.
pub const LOCAL_PLAYER_ENTITY_ID: i64 = -2;
