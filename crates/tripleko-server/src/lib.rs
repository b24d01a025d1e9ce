//! Tripleko Server: the browser-facing HTTP façade.
//!
//! Maps each HTTP endpoint to one backend operation (or a template page),
//! and translates validation and upstream failures into HTTP responses.

pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod templates;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use router::{GatewayState, gateway_router};
pub use server::GatewayServer;
pub use templates::{Lookup, TemplateStore};
