//! Request middleware.
//!
//! `error_pages` runs around every route: failed requests are logged with
//! their original path and answered with the matching error page. This
//! includes responses produced outside the handlers, such as axum's 405 or
//! a 404 from the static file service.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use crate::error::ErrorPage;
use crate::templates::TemplateStore;

/// Replace the body of every 4xx and 5xx response with an error page.
pub async fn error_pages(
    State(templates): State<TemplateStore>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let code = status.as_u16();
    match (response.extensions().get::<ErrorPage>(), status.is_server_error()) {
        (Some(ErrorPage { detail }), true) => warn!("{code} - {path}: {detail}"),
        (Some(ErrorPage { detail }), false) => info!("{code} - {path}: {detail}"),
        (None, true) => warn!("{code} - {path}"),
        (None, false) => info!("{code} - {path}"),
    }

    let page = templates.error_page(status).await;
    (status, Html(page)).into_response()
}
