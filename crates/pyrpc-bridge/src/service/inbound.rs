//! # Inbound Dispatch
//!
//! Gate, decode, snapshot, then run every handler in isolation.

use pyrpc_codec::{envelope, Envelope};
use pyrpc_registry::invoke_isolated;
use tracing::{debug, error, warn};

use super::PyRpcBridge;
use crate::domain::{DispatchOutcome, DispatchReport, IgnoreReason};
use crate::ports::inbound::PacketReceiver;
use crate::ports::outbound::{PyRpcPacket, SessionRef};

impl PacketReceiver for PyRpcBridge {
    fn on_packet_receive(&self, sender: &SessionRef, packet: &PyRpcPacket) -> DispatchOutcome {
        if packet.msg_id != self.config.msg_id {
            return DispatchOutcome::Ignored(IgnoreReason::ForeignMessageType);
        }
        if !self.is_enabled() {
            return DispatchOutcome::Ignored(IgnoreReason::NotEnabled);
        }
        if !sender.is_pyrpc_client() {
            debug!(origin = %sender.origin_name(), "Ignoring PyRpc packet from non-PyRpc client");
            return DispatchOutcome::Ignored(IgnoreReason::IneligibleSender);
        }

        match envelope::decode(&packet.data) {
            Ok(envelope) => DispatchOutcome::Dispatched(self.dispatch(sender, envelope)),
            Err(e) => {
                self.metrics.record_decode_failure();
                warn!(
                    origin = %sender.origin_name(),
                    bytes = packet.data.len(),
                    error = %e,
                    "Dropping malformed PyRpc packet"
                );
                DispatchOutcome::Dropped(e)
            }
        }
    }
}

impl PyRpcBridge {
    /// Run every handler bound to the envelope's key, in registration order.
    ///
    /// The snapshot is taken once; registrations made while handlers run
    /// apply to the next packet.
    fn dispatch(&self, sender: &SessionRef, envelope: Envelope) -> DispatchReport {
        let key = envelope.event_key();
        debug!(
            direction = envelope.direction.tag(),
            namespace = %envelope.namespace,
            system = %envelope.system,
            event = %envelope.event,
            origin = %sender.origin_name(),
            "PyRpc event received"
        );

        let handlers = self.registry.snapshot(&key);
        let mut completed = 0;
        let mut faults = Vec::new();

        for (index, handler) in handlers.iter().enumerate() {
            match invoke_isolated(handler, sender, &envelope.payload) {
                Ok(()) => completed += 1,
                Err(fault) => {
                    error!(event_key = %key, handler = index, error = %fault, "PyRpc handler fault");
                    faults.push((index, fault));
                }
            }
        }

        self.metrics.record_dispatch(faults.len());
        DispatchReport {
            key,
            completed,
            faults,
        }
    }
}
