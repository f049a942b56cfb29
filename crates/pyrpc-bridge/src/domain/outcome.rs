//! What dispatch and send operations report back.

use std::fmt;

use pyrpc_codec::{DecodeError, EventKey};
use pyrpc_registry::HandlerFault;

/// Why an inbound packet was not looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The packet's message-type id is not the PyRpc one.
    ForeignMessageType,
    /// The bridge is not in the `Enabled` state.
    NotEnabled,
    /// The sending session is not PyRpc capable.
    IneligibleSender,
}

/// Result of one dispatched event.
#[derive(Debug)]
pub struct DispatchReport {
    pub key: EventKey,
    /// Handlers that returned normally.
    pub completed: usize,
    /// Faults keyed by the handler's index in the snapshot.
    pub faults: Vec<(usize, HandlerFault)>,
}

impl DispatchReport {
    /// Handlers invoked, successful or not.
    pub fn invoked(&self) -> usize {
        self.completed + self.faults.len()
    }

    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Result of handing one packet to the bridge.
#[derive(Debug)]
pub enum DispatchOutcome {
    Ignored(IgnoreReason),
    /// The payload could not be decoded; the packet is gone.
    Dropped(DecodeError),
    Dispatched(DispatchReport),
}

impl DispatchOutcome {
    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Dispatched(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }
}

/// Result of [`crate::PyRpcApi::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A single-target send; `true` if the packet was handed over.
    Single(bool),
    /// A multi-target send; number of sessions the packet was handed to.
    Delivered(usize),
}

impl SendOutcome {
    /// Packets handed over, whatever the addressing mode.
    pub fn delivered(&self) -> usize {
        match *self {
            Self::Single(sent) => usize::from(sent),
            Self::Delivered(count) => count,
        }
    }
}

/// Plugin lifecycle states.
///
/// ```text
/// Created ──on_load──► Loaded ──on_enable──► Enabled ──on_disable──► Disabled
///                                               ▲                       │
///                                               └───────on_enable───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Created,
    Loaded,
    Enabled,
    Disabled,
}

impl LifecycleState {
    /// Whether the state machine allows moving to `next`.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Created, Loaded) | (Loaded, Enabled) | (Enabled, Disabled) | (Disabled, Enabled)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Loaded => "loaded",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        };
        f.write_str(name)
    }
}
