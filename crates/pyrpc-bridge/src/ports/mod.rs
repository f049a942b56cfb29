//! # Ports
//!
//! - **inbound**: what the bridge offers (API, packet receiver, lifecycle)
//! - **outbound**: what the bridge needs from the host (sessions, lookup)

pub mod inbound;
pub mod outbound;
