//! # PyRpc Codec
//!
//! Bit-exact encoding and decoding of PyRpc messages.
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ array(3)                                                      │
//! │  [0] bin  "ModEventS2C" | "ModEventC2S"      (direction tag)  │
//! │  [1] array(4)                                                 │
//! │        [0] bin namespace                                      │
//! │        [1] bin system                                         │
//! │        [2] bin event                                          │
//! │        [3] map { bin key => value, ... }     (payload)        │
//! │  [2] nil                                                      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every string on the wire (tag, names, map keys, string values) is written
//! with the MessagePack `bin` family, never `str`.
//!
//! ## Layers
//!
//! - [`value`]: [`NativeValue`] (what application code builds) and
//!   [`WireValue`] (what is on the wire), plus the value codec.
//! - [`envelope`]: the 3-element envelope around the 4-element event tuple.
//! - [`key`]: the `namespace:system:event` address of an event channel.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod envelope;
pub mod error;
pub mod key;
pub mod value;

pub use envelope::{Direction, Envelope, EVENT_TYPE_C2S, EVENT_TYPE_S2C};
pub use error::{CodecError, DecodeError, EncodeError};
pub use key::EventKey;
pub use value::{NativeValue, Payload, WireValue};

/// Number of elements in the outer envelope sequence.
pub const ENVELOPE_LEN: usize = 3;

/// Number of elements in the inner event-detail tuple.
pub const EVENT_DETAIL_LEN: usize = 4;
