//! Outbound ports (SPI) for the PyRpc bridge.
//!
//! The host server implements these; the bridge never owns a connection.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::domain::{BroadcastScope, Position};

/// Host-assigned connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// One raw packet on the PyRpc message-type channel.
///
/// `data` is reference counted, so handing the same packet to many
/// sessions never copies the encoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyRpcPacket {
    pub msg_id: u64,
    pub data: Bytes,
}

impl PyRpcPacket {
    pub fn new(msg_id: u64, data: impl Into<Bytes>) -> Self {
        Self {
            msg_id,
            data: data.into(),
        }
    }
}

/// A connected client as seen by the bridge.
pub trait ClientSession: Send + Sync {
    fn session_id(&self) -> SessionId;

    /// Human-readable origin (player or connection name) for logs.
    fn origin_name(&self) -> String;

    /// Whether the client speaks PyRpc. Packets are never sent to, nor
    /// accepted from, sessions that answer `false`.
    fn is_pyrpc_client(&self) -> bool;

    /// Current position, if the session has entered a world.
    fn position(&self) -> Option<Position>;

    /// Queue a packet on the session's normal send path.
    fn send_packet(&self, packet: PyRpcPacket);

    /// Send a packet bypassing the session's send queue.
    fn send_packet_immediately(&self, packet: PyRpcPacket);
}

/// Shared handle to a session.
pub type SessionRef = Arc<dyn ClientSession>;

/// Host lookup of connected sessions.
pub trait SessionDirectory: Send + Sync {
    /// Sessions inside `scope`, in any order.
    fn sessions(&self, scope: &BroadcastScope) -> Vec<SessionRef>;
}
