//! Tripleko Transport Layer
//!
//! Short-lived WebSocket channels from the gateway to the board backend.
//! The transport layer handles:
//! - Channel lifecycle (open, one exchange, close) with a per-exchange deadline
//! - Retrieval exchanges (one base64 reply, decoded)
//! - Framed event delivery (length header, then JSON payload)
//!
//! The HTTP layer is decoupled from the wire via the `BoardBackend` trait.
//! The `stub` feature adds `StubBackend`, a scripted backend for tests.

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "stub")]
pub mod stub;

pub use channel::{Channel, ExchangeMode, exchange, send_only};
pub use client::{BackendClient, BoardBackend};
pub use config::ChannelConfig;
pub use error::ChannelError;
#[cfg(feature = "stub")]
pub use stub::{Received, StubBackend, StubReply};
