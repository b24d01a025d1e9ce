//! Retrieval replies: a single base64 text message carrying document bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ProtocolError;

/// Decode a retrieval reply into raw document bytes.
///
/// Line breaks and surrounding whitespace are ignored; any other character
/// outside the standard alphabet is an error.
pub fn decode_reply(message: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let compact: Vec<u8> = message
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}
