//! Event channel addressing.

use std::fmt;

/// Separator between the three key fields.
pub const KEY_SEPARATOR: char = ':';

/// Canonical `namespace:system:event` address of one event channel.
///
/// Fields are joined verbatim with no escaping, so a `:` inside a field can
/// make two different triples collide. Callers keep `:` out of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    pub fn new(namespace: &str, system: &str, event: &str) -> Self {
        let mut key = String::with_capacity(namespace.len() + system.len() + event.len() + 2);
        key.push_str(namespace);
        key.push(KEY_SEPARATOR);
        key.push_str(system);
        key.push(KEY_SEPARATOR);
        key.push_str(event);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EventKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
