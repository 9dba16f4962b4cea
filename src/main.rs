//! Quizgen · Exam Generation Backend
//!
//! - Axum HTTP API: upload a document for a summary, then request questions
//! - Questions are generated by a hosted Ollama-compatible model
//! - Static frontend from ./static (index.html at `/`)
//!
//! Important env variables:
//!   QUIZGEN_CONFIG_PATH  : path to TOML config (all fields optional)
//!   PORT                 : u16 (default 10000)
//!   GENERATE_URL         : upstream `/api/generate` endpoint
//!   SUMMARY_MODEL        : default "llama3.2:3b"
//!   QUESTION_MODEL       : default "llama3.2:3b"
//!   REQUEST_TIMEOUT_SECS : per-call upstream timeout (default 300)
//!   MAX_CONCURRENT_GENERATIONS : specs generated at once (default 1)
//!   STATIC_DIR           : default "./static"
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default), "compact" or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod taxonomy;
mod extract;
mod upload;
mod llm;
mod prompts;
mod parse;
mod generators;
mod summarizer;
mod exam;
mod error;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = AppConfig::load();
  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

  // Build shared application state (config, generation client, components).
  let state = Arc::new(AppState::new(config)?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quizgen", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "quizgen", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quizgen", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "quizgen", "Shutdown signal received");
}
