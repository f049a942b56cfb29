//! # Handlers and Fault Isolation
//!
//! A [`Handler`] is a shared callback `(sender, payload) -> anyhow::Result<()>`.
//! [`invoke_isolated`] runs one handler and turns either an `Err` or a panic
//! into a [`HandlerFault`] value, so a faulty handler can never unwind
//! through the dispatch loop.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use pyrpc_codec::Payload;
use thiserror::Error;

/// Application callback bound to an event key.
///
/// Clones share the callback and compare equal; two handlers built from
/// separate `Handler::new` calls never do.
pub struct Handler<S: ?Sized> {
    callback: Arc<dyn Fn(&S, &Payload) -> anyhow::Result<()> + Send + Sync>,
}

impl<S: ?Sized> Handler<S> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&S, &Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Call the handler directly, without isolation.
    pub fn call(&self, sender: &S, payload: &Payload) -> anyhow::Result<()> {
        (self.callback)(sender, payload)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.callback) as *const ()
    }
}

impl<S: ?Sized> Clone for Handler<S> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S: ?Sized> PartialEq for Handler<S> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<S: ?Sized> Eq for Handler<S> {}

impl<S: ?Sized> fmt::Debug for Handler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("addr", &self.addr()).finish()
    }
}

/// A handler invocation that did not complete normally.
#[derive(Debug, Error)]
pub enum HandlerFault {
    /// The handler returned an error.
    #[error("handler failed: {0:#}")]
    Failed(anyhow::Error),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Run one handler, capturing errors and panics.
pub fn invoke_isolated<S: ?Sized>(
    handler: &Handler<S>,
    sender: &S,
    payload: &Payload,
) -> Result<(), HandlerFault> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.call(sender, payload))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(HandlerFault::Failed(e)),
        Err(panic) => Err(HandlerFault::Panicked(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
