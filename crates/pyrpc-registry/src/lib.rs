//! # PyRpc Listener Registry
//!
//! Routes decoded events to application handlers by [`EventKey`].
//!
//! ## Concurrency Model
//!
//! ```text
//!  app threads                         network threads
//!  ───────────                         ───────────────
//!  register()   ──┐                 ┌── snapshot(key) ── invoke H1, H2, ...
//!  unregister() ──┼──► DashMap ◄────┘        (no lock held)
//!  clear()      ──┘  key → Arc<Vec<Handler>>
//! ```
//!
//! Each key maps to an immutable, shared handler list. Writers replace the
//! list copy-on-write under the owning shard lock; readers clone the `Arc`
//! and release the lock before calling anything. An in-flight dispatch
//! keeps iterating the list it started with.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod handler;
pub mod registry;

pub use handler::{invoke_isolated, Handler, HandlerFault};
pub use pyrpc_codec::EventKey;
pub use registry::{HandlerSnapshot, ListenerRegistry};
