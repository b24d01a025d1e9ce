//! Tripleko backend protocol types.
//!
//! The gateway talks to the board-state backend over short-lived WebSocket
//! channels. This crate is the single source of truth for:
//! - Board identifier sanitization and generation
//! - Channel endpoint paths
//! - Framed event encoding (length header + JSON payload)
//! - Retrieval reply decoding (base64)

pub mod board;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod reply;

pub use board::{BoardId, sanitize};
pub use endpoint::{Endpoint, Routes};
pub use error::ProtocolError;
pub use event::{Events, FramedEvent, HEADER_LEN};
pub use reply::decode_reply;
