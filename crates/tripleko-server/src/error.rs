//! HTTP-level error translation.

use axum::{
    extract::rejection::{FormRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tripleko_transport::ChannelError;

/// Why a request could not be answered normally.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request named a board id with disallowed characters.
    #[error("invalid board id: {0:?}")]
    Validation(String),

    /// The request could not be parsed (bad percent-encoding, wrong body
    /// type).
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Unknown route or missing script template.
    #[error("not found")]
    NotFound,

    /// A page template the gateway needs is not installed.
    #[error("page template {0} is missing")]
    MissingTemplate(String),

    /// The backend could not deliver.
    #[error(transparent)]
    Upstream(#[from] ChannelError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingTemplate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<FormRejection> for GatewayError {
    fn from(rejection: FormRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

/// Marker left on error responses; the error-page middleware swaps the body
/// for the matching page and logs `detail` with the request path.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, status.canonical_reason().unwrap_or("Error")).into_response();
        response.extensions_mut().insert(ErrorPage {
            detail: self.to_string(),
        });
        response
    }
}
