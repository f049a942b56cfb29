//! # Test Fixtures
//!
//! In-memory stand-ins for the host server.

use std::sync::Arc;

use parking_lot::Mutex;
use pyrpc_bridge::{
    BridgeConfig, BridgeError, BroadcastScope, ClientSession, PluginLifecycle, Position,
    PyRpcBridge, PyRpcPacket, SessionDirectory, SessionId, SessionRef, PYRPC_MSG_ID,
};
use pyrpc_codec::{envelope, Direction, EncodeError, Envelope, Payload};

/// A connected client that records every packet it is handed.
pub struct TestSession {
    id: u64,
    pyrpc: bool,
    position: Option<Position>,
    record: bool,
    received: Mutex<Vec<PyRpcPacket>>,
}

impl TestSession {
    pub fn new(id: u64, pyrpc: bool) -> Arc<Self> {
        Self::at(id, pyrpc, None)
    }

    pub fn at(id: u64, pyrpc: bool, position: Option<Position>) -> Arc<Self> {
        Arc::new(Self {
            id,
            pyrpc,
            position,
            record: true,
            received: Mutex::new(Vec::new()),
        })
    }

    /// A session that accepts packets without keeping them.
    pub fn discarding(id: u64, pyrpc: bool) -> Arc<Self> {
        Arc::new(Self {
            id,
            pyrpc,
            position: None,
            record: false,
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn handle(self: &Arc<Self>) -> SessionRef {
        self.clone()
    }

    pub fn received(&self) -> Vec<PyRpcPacket> {
        self.received.lock().clone()
    }

    /// Decode every received packet, skipping any that fail.
    pub fn received_envelopes(&self) -> Vec<Envelope> {
        self.received
            .lock()
            .iter()
            .filter_map(|p| envelope::decode(&p.data).ok())
            .collect()
    }
}

impl ClientSession for TestSession {
    fn session_id(&self) -> SessionId {
        SessionId(self.id)
    }

    fn origin_name(&self) -> String {
        format!("test-player-{}", self.id)
    }

    fn is_pyrpc_client(&self) -> bool {
        self.pyrpc
    }

    fn position(&self) -> Option<Position> {
        self.position
    }

    fn send_packet(&self, packet: PyRpcPacket) {
        if self.record {
            self.received.lock().push(packet);
        }
    }

    fn send_packet_immediately(&self, packet: PyRpcPacket) {
        self.send_packet(packet);
    }
}

/// Session lookup backed by a plain list.
#[derive(Default)]
pub struct TestDirectory {
    sessions: Mutex<Vec<SessionRef>>,
}

impl TestDirectory {
    pub fn add(&self, session: SessionRef) {
        self.sessions.lock().push(session);
    }
}

impl SessionDirectory for TestDirectory {
    fn sessions(&self, scope: &BroadcastScope) -> Vec<SessionRef> {
        self.sessions
            .lock()
            .iter()
            .filter(|s| scope.contains(s.position().as_ref()))
            .cloned()
            .collect()
    }
}

/// A loaded and enabled bridge plus its directory.
pub fn enabled_bridge() -> Result<(Arc<PyRpcBridge>, Arc<TestDirectory>), BridgeError> {
    let directory = Arc::new(TestDirectory::default());
    let bridge = Arc::new(PyRpcBridge::new(BridgeConfig::default(), directory.clone()));
    bridge.on_load()?;
    bridge.on_enable()?;
    Ok((bridge, directory))
}

/// Encode a client-to-server event the way a PyRpc client would.
pub fn client_packet(
    namespace: &str,
    system: &str,
    event: &str,
    payload: &Payload,
) -> Result<PyRpcPacket, EncodeError> {
    let bytes = envelope::encode(&Direction::ClientToServer, namespace, system, event, payload)?;
    Ok(PyRpcPacket::new(PYRPC_MSG_ID, bytes))
}
