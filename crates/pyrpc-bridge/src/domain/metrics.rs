//! Bridge counters.
//!
//! Lock-free, relaxed ordering. Counters only grow; readers take a
//! [`MetricsSnapshot`] instead of loading fields one by one.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runtime counters for one bridge instance.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Envelope encode passes (one per send call that got that far)
    pub envelopes_encoded: AtomicU64,
    /// Envelope encodes that failed
    pub encode_failures: AtomicU64,
    /// Packets handed to a session
    pub packets_sent: AtomicU64,
    /// Targets skipped as not PyRpc-capable
    pub ineligible_skipped: AtomicU64,
    /// Inbound packets dropped as malformed
    pub decode_failures: AtomicU64,
    /// Inbound events that reached the handler stage
    pub events_dispatched: AtomicU64,
    /// Handler invocations that failed or panicked
    pub handler_faults: AtomicU64,
}

impl BridgeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_encode(&self) {
        self.envelopes_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_encode_failure(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self, packets: usize) {
        self.packets_sent.fetch_add(packets as u64, Ordering::Relaxed);
    }

    pub fn record_ineligible(&self, targets: usize) {
        self.ineligible_skipped.fetch_add(targets as u64, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one dispatched event and how many of its handlers faulted.
    pub fn record_dispatch(&self, faults: usize) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
        if faults > 0 {
            self.handler_faults.fetch_add(faults as u64, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            envelopes_encoded: self.envelopes_encoded.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            ineligible_skipped: self.ineligible_skipped.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            handler_faults: self.handler_faults.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BridgeMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub envelopes_encoded: u64,
    pub encode_failures: u64,
    pub packets_sent: u64,
    pub ineligible_skipped: u64,
    pub decode_failures: u64,
    pub events_dispatched: u64,
    pub handler_faults: u64,
}
