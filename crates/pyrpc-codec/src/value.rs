//! # Value Model and Value Codec
//!
//! Two closed value types:
//!
//! - [`NativeValue`]: what application code builds and handlers receive.
//! - [`WireValue`]: the tagged tree that maps 1:1 onto MessagePack markers.
//!
//! `WireValue` has no native-string variant. Text is lowered to
//! [`WireValue::Binary`] holding its UTF-8 bytes, so the "strings are always
//! `bin`" rule cannot be broken by construction.
//!
//! ## Lossy Decode
//!
//! A `bin` value always decodes back to [`NativeValue::String`] (invalid UTF-8
//! sequences become U+FFFD). Raw byte payloads therefore come back as text.

use indexmap::IndexMap;
use std::fmt;

use crate::error::{DecodeError, EncodeError};

/// Event payload: string keys in insertion order.
pub type Payload = IndexMap<String, NativeValue>;

// =============================================================================
// NATIVE VALUE
// =============================================================================

/// Application-facing payload value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NativeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<NativeValue>),
    Map(IndexMap<String, NativeValue>),
}

impl NativeValue {
    /// Raw bytes. Encoded with the `bin` tag like any string.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Textual representation of anything displayable.
    ///
    /// Types without a dedicated variant are carried this way.
    pub fn text(value: impl fmt::Display) -> Self {
        Self::String(value.to_string())
    }

    /// An empty map value.
    pub fn map() -> Self {
        Self::Map(IndexMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NativeValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, NativeValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&NativeValue> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! native_from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

native_from_small_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! native_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NativeValue {
                /// Values outside the `i64` range fall back to their text.
                fn from(value: $ty) -> Self {
                    match i64::try_from(value) {
                        Ok(n) => Self::Int(n),
                        Err(_) => Self::text(value),
                    }
                }
            }
        )*
    };
}

native_from_wide_int!(u64, usize, isize, i128, u128);

impl From<f32> for NativeValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&[u8]> for NativeValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<T: Into<NativeValue>> From<Vec<T>> for NativeValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, NativeValue>> for NativeValue {
    fn from(map: IndexMap<String, NativeValue>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for NativeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or_else(|| Self::text(&n), Self::Float),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

// =============================================================================
// WIRE VALUE
// =============================================================================

/// Tagged value tree as it appears on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Binary(Vec<u8>),
    Array(Vec<WireValue>),
    Map(IndexMap<String, WireValue>),
}

impl WireValue {
    /// Text as a `bin` value.
    pub fn text(s: &str) -> Self {
        Self::Binary(s.as_bytes().to_vec())
    }

    /// Lower a native value onto the wire model.
    pub fn from_native(value: &NativeValue) -> Self {
        match value {
            NativeValue::Null => Self::Nil,
            NativeValue::Bool(b) => Self::Bool(*b),
            NativeValue::Int(n) => Self::Int(*n),
            NativeValue::Float(f) => Self::Float(*f),
            NativeValue::String(s) => Self::text(s),
            NativeValue::Bytes(b) => Self::Binary(b.clone()),
            NativeValue::List(items) => Self::Array(items.iter().map(Self::from_native).collect()),
            NativeValue::Map(map) => Self::from_payload(map),
        }
    }

    /// Lower a payload map.
    pub fn from_payload(payload: &IndexMap<String, NativeValue>) -> Self {
        Self::Map(
            payload
                .iter()
                .map(|(k, v)| (k.clone(), Self::from_native(v)))
                .collect(),
        )
    }

    /// Lift into the native model. `Binary` becomes `String` (lossy).
    pub fn into_native(self) -> NativeValue {
        match self {
            Self::Nil => NativeValue::Null,
            Self::Bool(b) => NativeValue::Bool(b),
            Self::Int(n) => NativeValue::Int(n),
            Self::Float(f) => NativeValue::Float(f),
            Self::Binary(b) => NativeValue::String(utf8_lossy(b)),
            Self::Array(items) => {
                NativeValue::List(items.into_iter().map(Self::into_native).collect())
            }
            Self::Map(map) => NativeValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, v.into_native()))
                    .collect(),
            ),
        }
    }

    /// Textual rendering, used where a string is required but something
    /// else arrived.
    pub fn into_text(self) -> String {
        match self {
            Self::Binary(b) => utf8_lossy(b),
            other => other.to_string(),
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    fn from_rmpv(value: rmpv::Value) -> Self {
        match value {
            rmpv::Value::Nil => Self::Nil,
            rmpv::Value::Boolean(b) => Self::Bool(b),
            rmpv::Value::Integer(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Binary(n.to_string().into_bytes()),
            },
            rmpv::Value::F32(f) => Self::Float(f64::from(f)),
            rmpv::Value::F64(f) => Self::Float(f),
            // Native `str` from a non-conforming peer is treated like `bin`.
            rmpv::Value::String(s) => Self::Binary(s.into_bytes()),
            rmpv::Value::Binary(b) => Self::Binary(b),
            rmpv::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_rmpv).collect())
            }
            rmpv::Value::Map(entries) => Self::Map(
                entries
                    .into_iter()
                    .filter_map(|(k, v)| map_key(k).map(|k| (k, Self::from_rmpv(v))))
                    .collect(),
            ),
            ext @ rmpv::Value::Ext(..) => Self::Binary(ext.to_string().into_bytes()),
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Binary(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Map keys are strings; nil keys are skipped, anything else uses its text.
fn map_key(key: rmpv::Value) -> Option<String> {
    match key {
        rmpv::Value::Nil => None,
        other => Some(WireValue::from_rmpv(other).into_text()),
    }
}

fn utf8_lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

// =============================================================================
// VALUE CODEC
// =============================================================================

/// Nesting budget for decoding, counted in rmpv depth units.
///
/// Input nested deeper than this is rejected as malformed instead of
/// recursing until the stack runs out.
pub const MAX_DECODE_DEPTH: usize = 64;

/// Encode a native value to MessagePack bytes.
pub fn encode(value: &NativeValue) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    write_native(&mut buf, value)?;
    Ok(buf)
}

/// Append a native value to `buf`, streaming straight from the borrowed
/// value.
pub fn write_native(buf: &mut Vec<u8>, value: &NativeValue) -> Result<(), EncodeError> {
    match value {
        NativeValue::Null => write_nil(buf),
        NativeValue::Bool(b) => write_bool(buf, *b),
        NativeValue::Int(n) => write_int(buf, *n),
        NativeValue::Float(f) => {
            rmp::encode::write_f64(buf, *f)?;
            Ok(())
        }
        NativeValue::String(s) => write_text(buf, s),
        NativeValue::Bytes(b) => write_bin(buf, b),
        NativeValue::List(items) => {
            write_array_header(buf, items.len())?;
            for item in items {
                write_native(buf, item)?;
            }
            Ok(())
        }
        NativeValue::Map(map) => write_payload(buf, map),
    }
}

/// Append a payload map. Keys are written as `bin`.
pub fn write_payload(buf: &mut Vec<u8>, payload: &Payload) -> Result<(), EncodeError> {
    write_map_header(buf, payload.len())?;
    for (key, value) in payload {
        write_text(buf, key)?;
        write_native(buf, value)?;
    }
    Ok(())
}

/// Append the MessagePack form of a wire value to `buf`.
pub fn write_wire(buf: &mut Vec<u8>, value: &WireValue) -> Result<(), EncodeError> {
    match value {
        WireValue::Nil => write_nil(buf),
        WireValue::Bool(b) => write_bool(buf, *b),
        WireValue::Int(n) => write_int(buf, *n),
        WireValue::Float(f) => {
            rmp::encode::write_f64(buf, *f)?;
            Ok(())
        }
        WireValue::Binary(b) => write_bin(buf, b),
        WireValue::Array(items) => {
            write_array_header(buf, items.len())?;
            for item in items {
                write_wire(buf, item)?;
            }
            Ok(())
        }
        WireValue::Map(map) => {
            write_map_header(buf, map.len())?;
            for (key, value) in map {
                write_text(buf, key)?;
                write_wire(buf, value)?;
            }
            Ok(())
        }
    }
}

pub(crate) fn write_text(buf: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    write_bin(buf, s.as_bytes())
}

pub(crate) fn write_nil(buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    rmp::encode::write_nil(buf).map_err(rmp::encode::ValueWriteError::InvalidMarkerWrite)?;
    Ok(())
}

pub(crate) fn write_array_header(buf: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    rmp::encode::write_array_len(buf, header_len(len)?)?;
    Ok(())
}

fn write_map_header(buf: &mut Vec<u8>, len: usize) -> Result<(), EncodeError> {
    rmp::encode::write_map_len(buf, header_len(len)?)?;
    Ok(())
}

fn write_bin(buf: &mut Vec<u8>, data: &[u8]) -> Result<(), EncodeError> {
    rmp::encode::write_bin(buf, data)?;
    Ok(())
}

fn write_bool(buf: &mut Vec<u8>, b: bool) -> Result<(), EncodeError> {
    rmp::encode::write_bool(buf, b).map_err(rmp::encode::ValueWriteError::InvalidMarkerWrite)?;
    Ok(())
}

/// Non-negative integers take the unsigned markers, as rmpv writes them.
fn write_int(buf: &mut Vec<u8>, n: i64) -> Result<(), EncodeError> {
    match u64::try_from(n) {
        Ok(u) => rmp::encode::write_uint(buf, u)?,
        Err(_) => rmp::encode::write_sint(buf, n)?,
    };
    Ok(())
}

fn header_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLong(len))
}

/// Decode the first MessagePack value in `bytes`.
///
/// Fails only on empty, truncated, structurally malformed or too deeply
/// nested input. Trailing bytes after the first value are ignored.
pub fn decode(bytes: &[u8]) -> Result<WireValue, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut reader = bytes;
    let value = rmpv::decode::read_value_with_max_depth(&mut reader, MAX_DECODE_DEPTH)?;
    Ok(WireValue::from_rmpv(value))
}
