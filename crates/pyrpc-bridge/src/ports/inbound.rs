//! Inbound ports (API) for the PyRpc bridge.

use pyrpc_codec::{EventKey, Payload};

use crate::domain::{BroadcastScope, DispatchOutcome, Position, SendOutcome};
use crate::error::BridgeError;
use crate::ports::outbound::{PyRpcPacket, SessionRef};
use crate::service::SessionHandler;

/// Who an outbound event goes to.
#[derive(Clone, Copy)]
pub enum Recipients<'a> {
    /// One session, queued.
    One(&'a SessionRef),
    /// One session, bypassing its send queue.
    OneImmediate(&'a SessionRef),
    /// An explicit list of sessions.
    Many(&'a [SessionRef]),
    /// Sessions within `distance` of `position`, minus `except`.
    Nearby {
        except: Option<&'a SessionRef>,
        position: Position,
        distance: f64,
    },
    /// Every session inside `scope`, minus `except`.
    Broadcast {
        except: Option<&'a SessionRef>,
        scope: BroadcastScope,
    },
}

/// Primary API handed to application code.
///
/// Single-target sends return `false` and multi-target sends `0` instead of
/// failing; ineligible targets and encode errors are never raised.
pub trait PyRpcApi: Send + Sync {
    /// Bind `handler` to `namespace:system:event`.
    fn listen_for_event(&self, namespace: &str, system: &str, event: &str, handler: SessionHandler);

    /// Remove the first registration of `handler`. Returns `true` if removed.
    fn unlisten_for_event(
        &self,
        namespace: &str,
        system: &str,
        event: &str,
        handler: &SessionHandler,
    ) -> bool;

    /// Remove every handler of the key. Returns how many were removed.
    fn unlisten_all_for_event(&self, namespace: &str, system: &str, event: &str) -> usize;

    fn notify_to_client(
        &self,
        target: &SessionRef,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> bool;

    fn notify_to_client_immediately(
        &self,
        target: &SessionRef,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> bool;

    /// Send to every eligible session in `targets`, encoding once.
    fn notify_to_multi_clients(
        &self,
        targets: &[SessionRef],
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize;

    #[allow(clippy::too_many_arguments)]
    fn notify_to_clients_nearby(
        &self,
        except: Option<&SessionRef>,
        position: Position,
        distance: f64,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize;

    fn broadcast(
        &self,
        except: Option<&SessionRef>,
        scope: BroadcastScope,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize;

    /// Single entry point over every addressing mode.
    fn send(
        &self,
        recipients: Recipients<'_>,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> SendOutcome;

    fn is_pyrpc_client(&self, session: &SessionRef) -> bool;

    /// Number of event keys with at least one handler.
    fn registered_event_count(&self) -> usize;

    /// Whether any handler is bound to `key`.
    fn has_listeners(&self, key: &EventKey) -> bool;
}

/// Entry point for the host's network thread(s).
pub trait PacketReceiver: Send + Sync {
    /// Handle one inbound packet from `sender`. Never panics, never blocks
    /// on registration.
    fn on_packet_receive(&self, sender: &SessionRef, packet: &PyRpcPacket) -> DispatchOutcome;
}

/// Host plugin lifecycle hooks.
pub trait PluginLifecycle {
    fn on_load(&self) -> Result<(), BridgeError>;
    fn on_enable(&self) -> Result<(), BridgeError>;
    /// Tears down every registration.
    fn on_disable(&self) -> Result<(), BridgeError>;
}
