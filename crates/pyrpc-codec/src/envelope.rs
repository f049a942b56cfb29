//! # PyRpc Envelope
//!
//! Wraps the event-detail tuple in the fixed outer sequence:
//!
//! ```text
//! [direction_tag, [namespace, system, event, payload], nil]
//! ```
//!
//! Decoding is tolerant of extra trailing elements and of non-string name
//! fields (rendered as text), but a missing element, a non-sequence where a
//! sequence is expected, or a non-map payload is a [`DecodeError`].

use tracing::trace;

use crate::error::{DecodeError, EncodeError};
use crate::key::EventKey;
use crate::value::{self, Payload, WireValue};
use crate::{ENVELOPE_LEN, EVENT_DETAIL_LEN};

/// Direction tag for server-to-client events.
pub const EVENT_TYPE_S2C: &str = "ModEventS2C";

/// Direction tag for client-to-server events.
pub const EVENT_TYPE_C2S: &str = "ModEventC2S";

/// Which way an envelope travels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    ServerToClient,
    ClientToServer,
    /// Any other tag text. Kept so decoding never depends on the tag.
    Unrecognized(String),
}

impl Direction {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            EVENT_TYPE_S2C => Self::ServerToClient,
            EVENT_TYPE_C2S => Self::ClientToServer,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::ServerToClient => EVENT_TYPE_S2C,
            Self::ClientToServer => EVENT_TYPE_C2S,
            Self::Unrecognized(tag) => tag,
        }
    }
}

/// A decoded PyRpc message.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub direction: Direction,
    pub namespace: String,
    pub system: String,
    pub event: String,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(
        direction: Direction,
        namespace: impl Into<String>,
        system: impl Into<String>,
        event: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self {
            direction,
            namespace: namespace.into(),
            system: system.into(),
            event: event.into(),
            payload,
        }
    }

    /// Address of the channel this envelope belongs to.
    pub fn event_key(&self) -> EventKey {
        EventKey::new(&self.namespace, &self.system, &self.event)
    }

    /// Encode this envelope.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode(
            &self.direction,
            &self.namespace,
            &self.system,
            &self.event,
            &self.payload,
        )
    }
}

/// Encode one PyRpc message.
pub fn encode(
    direction: &Direction,
    namespace: &str,
    system: &str,
    event: &str,
    payload: &Payload,
) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    value::write_array_header(&mut buf, ENVELOPE_LEN)?;
    value::write_text(&mut buf, direction.tag())?;
    value::write_array_header(&mut buf, EVENT_DETAIL_LEN)?;
    for part in [namespace, system, event] {
        value::write_text(&mut buf, part)?;
    }
    value::write_payload(&mut buf, payload)?;
    value::write_nil(&mut buf)?;
    trace!(namespace, system, event, bytes = buf.len(), "PyRpc envelope encoded");
    Ok(buf)
}

/// Decode one PyRpc message.
pub fn decode(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    let result = decode_inner(bytes);
    if let Err(ref e) = result {
        trace!(error = %e, bytes = bytes.len(), "PyRpc envelope rejected");
    }
    result
}

fn decode_inner(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    let WireValue::Array(outer) = value::decode(bytes)? else {
        return Err(DecodeError::NotASequence);
    };
    if outer.len() < ENVELOPE_LEN - 1 {
        return Err(DecodeError::EnvelopeTooShort { len: outer.len() });
    }

    let mut outer = outer.into_iter();
    let (Some(tag), Some(details)) = (outer.next(), outer.next()) else {
        return Err(DecodeError::EnvelopeTooShort { len: 0 });
    };

    let WireValue::Array(details) = details else {
        return Err(DecodeError::DetailsNotASequence);
    };
    if details.len() < EVENT_DETAIL_LEN {
        return Err(DecodeError::DetailsTooShort { len: details.len() });
    }

    let mut details = details.into_iter();
    let (Some(namespace), Some(system), Some(event), Some(payload)) =
        (details.next(), details.next(), details.next(), details.next())
    else {
        return Err(DecodeError::DetailsTooShort { len: 0 });
    };

    let WireValue::Map(payload) = payload else {
        return Err(DecodeError::PayloadNotMap);
    };

    Ok(Envelope {
        direction: Direction::from_tag(&tag.into_text()),
        namespace: namespace.into_text(),
        system: system.into_text(),
        event: event.into_text(),
        payload: payload
            .into_iter()
            .map(|(k, v)| (k, v.into_native()))
            .collect(),
    })
}
