//! # Outbound Send Path
//!
//! Every call encodes at most once. Multi-target sends hand clones of one
//! [`PyRpcPacket`] to each eligible target; its `Bytes` buffer is shared.

use pyrpc_codec::{envelope, Direction, EventKey, Payload};
use tracing::{debug, error, trace};

use super::{PyRpcBridge, SessionHandler};
use crate::domain::{BroadcastScope, Position, SendOutcome};
use crate::ports::inbound::{PyRpcApi, Recipients};
use crate::ports::outbound::{PyRpcPacket, SessionRef};

/// Whether a candidate is the excluded session.
fn is_excluded(candidate: &SessionRef, except: Option<&SessionRef>) -> bool {
    except.is_some_and(|e| e.session_id() == candidate.session_id())
}

impl PyRpcBridge {
    /// Encode one S2C envelope into a packet. `None` if encoding failed.
    fn encode_packet(
        &self,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> Option<PyRpcPacket> {
        self.metrics.record_encode();
        match envelope::encode(&Direction::ServerToClient, namespace, system, event, payload) {
            Ok(bytes) => Some(PyRpcPacket::new(self.config.msg_id, bytes)),
            Err(e) => {
                self.metrics.record_encode_failure();
                error!(namespace, system, event, error = %e, "Failed to encode PyRpc event");
                None
            }
        }
    }

    fn send_single(
        &self,
        target: &SessionRef,
        immediate: bool,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> bool {
        if !target.is_pyrpc_client() {
            self.metrics.record_ineligible(1);
            trace!(origin = %target.origin_name(), "Skipping non-PyRpc client");
            return false;
        }

        let Some(packet) = self.encode_packet(namespace, system, event, payload) else {
            return false;
        };
        if immediate {
            target.send_packet_immediately(packet);
        } else {
            target.send_packet(packet);
        }
        self.metrics.record_sent(1);
        true
    }

    fn send_many(
        &self,
        targets: &[SessionRef],
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize {
        if targets.is_empty() {
            return 0;
        }
        let Some(packet) = self.encode_packet(namespace, system, event, payload) else {
            return 0;
        };

        let mut delivered = 0;
        for target in targets {
            if target.is_pyrpc_client() {
                target.send_packet(packet.clone());
                delivered += 1;
            }
        }

        let skipped = targets.len() - delivered;
        self.metrics.record_sent(delivered);
        self.metrics.record_ineligible(skipped);
        debug!(namespace, system, event, delivered, skipped, "PyRpc event sent to multiple clients");
        delivered
    }

    fn nearby_sessions(
        &self,
        except: Option<&SessionRef>,
        position: &Position,
        distance: f64,
    ) -> Vec<SessionRef> {
        self.directory
            .sessions(&BroadcastScope::Dimension(position.dimension))
            .into_iter()
            .filter(|s| !is_excluded(s, except))
            .filter(|s| s.position().is_some_and(|p| p.is_within(position, distance)))
            .collect()
    }

    fn scoped_sessions(&self, except: Option<&SessionRef>, scope: &BroadcastScope) -> Vec<SessionRef> {
        self.directory
            .sessions(scope)
            .into_iter()
            .filter(|s| !is_excluded(s, except))
            .collect()
    }
}

impl PyRpcApi for PyRpcBridge {
    fn listen_for_event(&self, namespace: &str, system: &str, event: &str, handler: SessionHandler) {
        self.registry
            .register(EventKey::new(namespace, system, event), handler);
    }

    fn unlisten_for_event(
        &self,
        namespace: &str,
        system: &str,
        event: &str,
        handler: &SessionHandler,
    ) -> bool {
        self.registry
            .unregister(&EventKey::new(namespace, system, event), handler)
    }

    fn unlisten_all_for_event(&self, namespace: &str, system: &str, event: &str) -> usize {
        self.registry
            .unregister_all(&EventKey::new(namespace, system, event))
    }

    fn notify_to_client(
        &self,
        target: &SessionRef,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> bool {
        self.send_single(target, false, namespace, system, event, payload)
    }

    fn notify_to_client_immediately(
        &self,
        target: &SessionRef,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> bool {
        self.send_single(target, true, namespace, system, event, payload)
    }

    fn notify_to_multi_clients(
        &self,
        targets: &[SessionRef],
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize {
        self.send_many(targets, namespace, system, event, payload)
    }

    fn notify_to_clients_nearby(
        &self,
        except: Option<&SessionRef>,
        position: Position,
        distance: f64,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize {
        let targets = self.nearby_sessions(except, &position, distance);
        self.send_many(&targets, namespace, system, event, payload)
    }

    fn broadcast(
        &self,
        except: Option<&SessionRef>,
        scope: BroadcastScope,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> usize {
        let targets = self.scoped_sessions(except, &scope);
        self.send_many(&targets, namespace, system, event, payload)
    }

    fn send(
        &self,
        recipients: Recipients<'_>,
        namespace: &str,
        system: &str,
        event: &str,
        payload: &Payload,
    ) -> SendOutcome {
        match recipients {
            Recipients::One(target) => {
                SendOutcome::Single(self.notify_to_client(target, namespace, system, event, payload))
            }
            Recipients::OneImmediate(target) => SendOutcome::Single(
                self.notify_to_client_immediately(target, namespace, system, event, payload),
            ),
            Recipients::Many(targets) => SendOutcome::Delivered(
                self.notify_to_multi_clients(targets, namespace, system, event, payload),
            ),
            Recipients::Nearby {
                except,
                position,
                distance,
            } => SendOutcome::Delivered(self.notify_to_clients_nearby(
                except, position, distance, namespace, system, event, payload,
            )),
            Recipients::Broadcast { except, scope } => SendOutcome::Delivered(
                self.broadcast(except, scope, namespace, system, event, payload),
            ),
        }
    }

    fn is_pyrpc_client(&self, session: &SessionRef) -> bool {
        session.is_pyrpc_client()
    }

    fn registered_event_count(&self) -> usize {
        self.registry.registered_event_count()
    }

    fn has_listeners(&self, key: &EventKey) -> bool {
        self.registry.has_handlers(key)
    }
}
