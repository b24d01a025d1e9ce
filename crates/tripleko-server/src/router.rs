//! Tripleko HTTP router. Maps each endpoint to one backend operation.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{
        Path as UrlPath, Query, State,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    middleware::from_fn_with_state,
    response::{Html, IntoResponse, Response},
    routing::{get, get_service, post},
};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use tripleko_protocol::{BoardId, Endpoint};
use tripleko_transport::BoardBackend;

use crate::error::GatewayError;
use crate::middleware::error_pages;
use crate::templates::{Lookup, TemplateStore};

/// Shared, read-only state of the router.
pub struct GatewayState<B: BoardBackend> {
    pub backend: B,
    pub templates: TemplateStore,
}

impl<B: BoardBackend> GatewayState<B> {
    pub fn new(backend: B, templates: TemplateStore) -> Self {
        Self { backend, templates }
    }

    /// A page template that must exist for the route to work.
    async fn page(&self, name: &str) -> Result<Html<String>, GatewayError> {
        match self.templates.lookup(name).await {
            Lookup::Found(page) => Ok(Html(page)),
            Lookup::NotFound => Err(GatewayError::MissingTemplate(name.to_string())),
        }
    }
}

/// Build the gateway's routes. `static_dir` is served under `/static`, and
/// its `favicon.svg` doubles as `/favicon.ico`.
pub fn gateway_router<B: BoardBackend>(state: Arc<GatewayState<B>>, static_dir: &Path) -> Router {
    let templates = state.templates.clone();

    Router::new()
        .route("/", get(index_handler::<B>))
        .route("/about", get(about_handler::<B>))
        .route("/about/", get(about_handler::<B>))
        .route("/health", get(health_handler))
        .route(
            "/favicon.ico",
            get_service(ServeFile::new(static_dir.join("favicon.svg"))),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/new", post(new_board_handler))
        .route("/upload", get(upload_handler::<B>))
        .route("/b/{id}", get(board_handler::<B>))
        .route("/b/{id}/", get(board_handler::<B>))
        .route("/b/{id}/sgf", get(sgf_handler::<B>))
        .route("/b/{id}/sgf/", get(sgf_handler::<B>))
        .route("/b/{id}/sgfix", get(sgfix_handler::<B>))
        .route("/b/{id}/sgfix/", get(sgfix_handler::<B>))
        .route("/{file}", get(script_handler::<B>))
        .fallback(fallback_handler)
        .layer(from_fn_with_state(templates, error_pages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages
// ─────────────────────────────────────────────────────────────────────────────

async fn index_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
) -> Result<Html<String>, GatewayError> {
    state.page("index.html").await
}

async fn about_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
) -> Result<Html<String>, GatewayError> {
    state.page("about.html").await
}

async fn board_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
    id: Result<UrlPath<String>, PathRejection>,
) -> Result<Html<String>, GatewayError> {
    let board = board_param(id)?;
    info!("[*] - {}", board.page_path());
    state.page("board.html").await
}

/// `/<name>.js`: script templates, served as JavaScript.
async fn script_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
    file: Result<UrlPath<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    let UrlPath(file) = file?;
    let is_script = file.strip_suffix(".js").is_some_and(|stem| !stem.is_empty());
    if !is_script {
        return Err(GatewayError::NotFound);
    }
    match state.templates.lookup(&file).await {
        Lookup::Found(script) => {
            Ok(([(header::CONTENT_TYPE, "text/javascript")], script).into_response())
        }
        Lookup::NotFound => Err(GatewayError::NotFound),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn fallback_handler() -> GatewayError {
    GatewayError::NotFound
}

/// The `{id}` segment as a strict board id.
fn board_param(id: Result<UrlPath<String>, PathRejection>) -> Result<BoardId, GatewayError> {
    let UrlPath(id) = id?;
    BoardId::parse(&id).map_err(|_| GatewayError::Validation(id))
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend retrieval
// ─────────────────────────────────────────────────────────────────────────────

async fn sgf_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
    id: Result<UrlPath<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    retrieve(&state, &board_param(id)?, Endpoint::Sgf).await
}

async fn sgfix_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
    id: Result<UrlPath<String>, PathRejection>,
) -> Result<Response, GatewayError> {
    retrieve(&state, &board_param(id)?, Endpoint::Sgfix).await
}

async fn retrieve<B: BoardBackend>(
    state: &GatewayState<B>,
    board: &BoardId,
    endpoint: Endpoint,
) -> Result<Response, GatewayError> {
    let body = state.backend.retrieve(board, endpoint).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], body).into_response())
}

// ─────────────────────────────────────────────────────────────────────────────
// Board creation
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded `key=value` pairs in request order. Repeated keys are kept.
type Params = Vec<(String, String)>;

/// First value of `key`; later repeats are ignored.
fn first<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

async fn new_board_handler(
    form: Result<Form<Params>, FormRejection>,
) -> Result<Response, GatewayError> {
    let Form(params) = form?;
    let board = BoardId::from_input(first(&params, "board_id").unwrap_or_default());
    Ok(found(&board.page_path()))
}

/// Create (or reuse) a board and, given a `url`, have the backend load the
/// SGF found there.
async fn upload_handler<B: BoardBackend>(
    State(state): State<Arc<GatewayState<B>>>,
    query: Result<Query<Params>, QueryRejection>,
) -> Result<Response, GatewayError> {
    let Query(params) = query?;
    let board = BoardId::from_input(first(&params, "board_id").unwrap_or_default());
    if let Some(url) = first(&params, "url") {
        state.backend.request_sgf(&board, url).await?;
        info!("Requested SGF for {board} from {url}");
    }
    Ok(found(&board.page_path()))
}

/// 302 Found to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
