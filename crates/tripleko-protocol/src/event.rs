//! Framed events: fire-and-forget instructions for the backend.
//!
//! Wire format, two consecutive binary messages on one channel:
//!   1. 4 bytes, little-endian u32 length of the payload
//!   2. ASCII JSON `{"event": <string>, "value": <string>}`
//!
//! The JSON uses `": "` and `", "` separators, and every non-ASCII character
//! is written as a `\uXXXX` escape (a surrogate pair outside the BMP). That
//! is the byte form the backend's fixtures were recorded with.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;

use crate::error::ProtocolError;

/// Size of the length header in bytes.
pub const HEADER_LEN: usize = 4;

/// Event names understood by the backend.
pub struct Events;

impl Events {
    /// Ask the backend to fetch an SGF document from `value` (a URL) and
    /// load it as the board's document.
    pub const REQUEST_SGF: &str = "request_sgf";
}

/// A typed event: name plus string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramedEvent {
    pub event: String,
    pub value: String,
}

impl FramedEvent {
    pub fn new(event: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            value: value.into(),
        }
    }

    pub fn request_sgf(url: impl Into<String>) -> Self {
        Self::new(Events::REQUEST_SGF, url)
    }

    /// Serialize the JSON payload.
    pub fn payload(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = Vec::with_capacity(32 + self.event.len() + self.value.len());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Encode into the (header, payload) message pair.
    pub fn encode(&self) -> Result<([u8; HEADER_LEN], Vec<u8>), ProtocolError> {
        let payload = self.payload()?;
        let len = u32::try_from(payload.len())
            .map_err(|_| ProtocolError::PayloadTooLarge(payload.len()))?;
        Ok((len.to_le_bytes(), payload))
    }

    /// Header and payload back to back, as they appear on the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let (header, payload) = self.encode()?;
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Decode a received (header, payload) message pair.
    pub fn decode(header: &[u8], payload: &[u8]) -> Result<Self, ProtocolError> {
        let header: [u8; HEADER_LEN] = header.try_into().map_err(|_| ProtocolError::BadHeader {
            expected: HEADER_LEN,
            actual: header.len(),
        })?;
        let declared = u32::from_le_bytes(header) as usize;
        if declared != payload.len() {
            return Err(ProtocolError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Compact JSON with a space after `:` and `,`, ASCII only.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
