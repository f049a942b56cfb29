//! # Error Types
//!
//! Codec failures are always recoverable: a decode failure means "drop the
//! packet", an encode failure means "report the send as unsuccessful".

use thiserror::Error;

/// Errors raised while turning values into bytes.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The MessagePack writer failed.
    #[error("MessagePack write failed: {0}")]
    Write(#[from] rmp::encode::ValueWriteError<std::io::Error>),

    /// A sequence or map longer than a MessagePack header can announce.
    #[error("Too many elements for a MessagePack header: {0}")]
    TooLong(usize),
}

/// Errors raised while turning bytes into an envelope or value tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No bytes at all.
    #[error("Empty input")]
    Empty,

    /// Truncated or structurally malformed MessagePack.
    #[error("Malformed MessagePack: {0}")]
    Malformed(String),

    /// The top-level value is not an array.
    #[error("Envelope is not a sequence")]
    NotASequence,

    /// The outer envelope has fewer than 2 elements.
    #[error("Envelope too short: {len} elements (need at least 2)")]
    EnvelopeTooShort { len: usize },

    /// Element [1] of the envelope is not an array.
    #[error("Event details are not a sequence")]
    DetailsNotASequence,

    /// The event-detail tuple has fewer than 4 elements.
    #[error("Event details too short: {len} elements (need at least 4)")]
    DetailsTooShort { len: usize },

    /// The payload element is not a map.
    #[error("Payload is not a map")]
    PayloadNotMap,
}

/// Any codec failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl From<rmp::encode::ValueWriteError<std::io::Error>> for CodecError {
    fn from(err: rmp::encode::ValueWriteError<std::io::Error>) -> Self {
        Self::Encode(EncodeError::Write(err))
    }
}

impl From<rmpv::decode::Error> for DecodeError {
    fn from(err: rmpv::decode::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
