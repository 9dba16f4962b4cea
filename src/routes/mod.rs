//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
  extract::DefaultBodyLimit,
  routing::{get, post},
  Router,
};
use tower_http::{
  cors::{Any, CorsLayer},
  services::{ServeDir, ServeFile},
  trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Slack on top of the upload ceiling for multipart framing, so oversize
/// files are reported with our own message rather than a bare 413.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router with:
/// - `POST /summarize` (multipart upload) and `POST /generate` (JSON)
/// - `GET /health` and `GET /taxonomy`
/// - `/` and `/static/*` served from the configured static directory
/// - CORS (allow any origin/method/headers); adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
  let static_dir = state.config.static_dir.clone();
  let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

  Router::new()
    .route("/health", get(http::http_health))
    .route("/taxonomy", get(http::http_get_taxonomy))
    .route("/summarize", post(http::http_post_summarize))
    .route("/generate", post(http::http_post_generate))
    .route_service("/", ServeFile::new(format!("{static_dir}/index.html")))
    .nest_service("/static", ServeDir::new(&static_dir))
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(state)
    .layer(
      CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
    )
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
