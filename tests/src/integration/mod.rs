//! # Integration Flows
//!
//! Codec, registry and bridge wired together through the public APIs only.

pub mod concurrency;
pub mod send_path;
