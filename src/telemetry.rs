//! Logging setup (tracing + tracing-subscriber).
//!
//! - LOG_LEVEL: EnvFilter directives, e.g. "debug" or
//!   "info,quizgen=debug,tower_http=warn". Invalid input falls back to the default.
//! - LOG_FORMAT: "pretty" (default), "compact" or "json".
//!
//! Service events use the `quizgen` target; module spans keep their paths.
//! The TraceLayer in `routes` adds per-request spans on top of this.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,quizgen=debug,quizgen_backend=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
  Pretty,
  Compact,
  Json,
}

impl LogFormat {
  fn from_env_value(raw: Option<&str>) -> Self {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
      Some("json") => LogFormat::Json,
      Some("compact") => LogFormat::Compact,
      _ => LogFormat::Pretty,
    }
  }
}

pub fn init_tracing() {
  let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
  let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

  // Each arm yields a different builder type, so init inside the match.
  match format {
    LogFormat::Json => builder.json().with_current_span(true).init(),
    LogFormat::Compact => builder.compact().init(),
    LogFormat::Pretty => builder.with_file(true).with_line_number(true).init(),
  }
}
