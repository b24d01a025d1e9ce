//! Protocol error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid board id: {0:?}")]
    InvalidBoardId(String),

    #[error("frame header must be {expected} bytes, got {actual}")]
    BadHeader { expected: usize, actual: usize },

    #[error("frame header announces {declared} bytes but payload has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("payload of {0} bytes does not fit a 32-bit length header")]
    PayloadTooLarge(usize),

    #[error("event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
