//! # Domain Layer for the PyRpc Bridge
//!
//! Plain data and pure logic, no I/O.
//!
//! ## Contents
//!
//! - **config**: `BridgeConfig` and its TOML / environment loading
//! - **geometry**: positions, dimensions and broadcast scopes
//! - **metrics**: atomic counters for encode, send, decode and dispatch
//! - **outcome**: results reported by dispatch and send operations

mod config;
mod geometry;
mod metrics;
mod outcome;

pub use config::*;
pub use geometry::*;
pub use metrics::*;
pub use outcome::*;
