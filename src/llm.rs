//! Client for the upstream text-generation endpoint (Ollama `/api/generate`).
//!
//! The endpoint streams newline-delimited JSON objects, each carrying a
//! `response` fragment. We concatenate fragments in arrival order and trim the
//! result. Calls log model names, latencies and sizes (not contents).
//!
//! Malformed lines are skipped with a warning; a line carrying an `error`
//! field fails the call. Transport failures are never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::config::AppConfig;
use crate::util::trunc_for_log;

#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("Generation endpoint returned HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("Generation request timed out after {0}s")]
  Timeout(u64),

  #[error("Generation endpoint unreachable: {0}")]
  Network(String),

  #[error("Generation endpoint reported an error: {0}")]
  Upstream(String),

  #[error("Failed to build HTTP client: {0}")]
  Client(String),
}

/// Seam between prompt-building code and the network.
#[async_trait]
pub trait GenerationClient: Send + Sync {
  async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct OllamaClient {
  pub client: reqwest::Client,
  pub url: String,
  pub timeout_secs: u64,
}

impl OllamaClient {
  pub fn new(cfg: &AppConfig) -> Result<Self, GenerationError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.request_timeout_secs))
      .build()
      .map_err(|e| GenerationError::Client(e.to_string()))?;
    Ok(Self { client, url: cfg.generate_url.clone(), timeout_secs: cfg.request_timeout_secs })
  }

  fn map_transport(&self, e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
      GenerationError::Timeout(self.timeout_secs)
    } else {
      GenerationError::Network(e.to_string())
    }
  }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
  model: &'a str,
  prompt: &'a str,
  stream: bool,
}

#[derive(Deserialize)]
struct Fragment {
  #[serde(default)]
  response: Option<String>,
  #[serde(default)]
  error: Option<String>,
}

#[async_trait]
impl GenerationClient for OllamaClient {
  #[instrument(level = "info", skip(self, prompt), fields(model = %model, prompt_len = prompt.len()))]
  async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
    let start = Instant::now();
    let req = GenerateRequest { model, prompt, stream: true };

    let res = self.client.post(&self.url)
      .header(USER_AGENT, "quizgen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req).send().await.map_err(|e| self.map_transport(e))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      error!(target: "quizgen", status, body = %trunc_for_log(&body, 200), "Generation endpoint returned an error status");
      return Err(GenerationError::Http { status, message: body });
    }

    let mut acc = NdjsonAccumulator::default();
    let mut stream = res.bytes_stream();
    while let Some(chunk) = stream.next().await {
      let chunk = chunk.map_err(|e| self.map_transport(e))?;
      acc.push_bytes(&chunk)?;
    }
    let skipped = acc.skipped;
    let text = acc.finish()?;

    info!(elapsed = ?start.elapsed(), response_len = text.len(), skipped_lines = skipped, "Generation complete");
    Ok(text)
  }
}

/// Reassembles `response` fragments from an NDJSON byte stream.
/// Chunk boundaries need not line up with line boundaries.
#[derive(Default)]
pub struct NdjsonAccumulator {
  buf: Vec<u8>,
  /// Prefix of `buf` already known to hold no newline.
  scanned: usize,
  text: String,
  pub skipped: usize,
}

impl NdjsonAccumulator {
  pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), GenerationError> {
    self.buf.extend_from_slice(bytes);
    let buf = std::mem::take(&mut self.buf);
    let mut line_start = 0;
    let mut result = Ok(());
    while let Some(rel) = buf[self.scanned..].iter().position(|b| *b == b'\n') {
      let end = self.scanned + rel;
      let line = &buf[line_start..end];
      line_start = end + 1;
      self.scanned = line_start;
      result = self.consume_line(line);
      if result.is_err() {
        break;
      }
    }
    self.buf = buf;
    self.buf.drain(..line_start);
    self.scanned = self.buf.len();
    result
  }

  /// Flush a trailing line without newline and return the trimmed text.
  pub fn finish(mut self) -> Result<String, GenerationError> {
    let rest = std::mem::take(&mut self.buf);
    self.consume_line(&rest)?;
    Ok(self.text.trim().to_string())
  }

  fn consume_line(&mut self, line: &[u8]) -> Result<(), GenerationError> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
      return Ok(());
    }
    match serde_json::from_str::<Fragment>(line) {
      Ok(Fragment { error: Some(msg), .. }) => Err(GenerationError::Upstream(msg)),
      Ok(Fragment { response, .. }) => {
        if let Some(r) = response { self.text.push_str(&r); }
        Ok(())
      }
      Err(e) => {
        self.skipped += 1;
        warn!(target: "quizgen", error = %e, line = %trunc_for_log(line, 80), "Skipping malformed stream line");
        Ok(())
      }
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client_for(server: &MockServer) -> OllamaClient {
    let cfg = AppConfig {
      generate_url: format!("{}/api/generate", server.uri()),
      request_timeout_secs: 5,
      ..AppConfig::default()
    };
    OllamaClient::new(&cfg).unwrap()
  }

  fn ndjson(lines: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(lines.join("\n"))
  }

  #[tokio::test]
  async fn concatenates_fragments_in_order_and_trims() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/api/generate"))
      .and(body_partial_json(json!({"model": "llama3.2:3b", "stream": true})))
      .respond_with(ndjson(&[
        r#"{"model":"llama3.2:3b","response":"  Cats ","done":false}"#,
        "",
        r#"{"model":"llama3.2:3b","response":"are mammals.","done":false}"#,
        r#"{"model":"llama3.2:3b","response":"  ","done":true}"#,
      ]))
      .mount(&server)
      .await;

    let text = client_for(&server).generate("llama3.2:3b", "Summarize").await.unwrap();
    assert_eq!(text, "Cats are mammals.");
  }

  #[tokio::test]
  async fn malformed_lines_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ndjson(&[
        r#"{"response":"[{\"question\":"}"#,
        "this is not json",
        r#"{"response":"\"Q\"}]"}"#,
      ]))
      .mount(&server)
      .await;

    let text = client_for(&server).generate("m", "p").await.unwrap();
    assert_eq!(text, r#"[{"question":"Q"}]"#);
  }

  #[tokio::test]
  async fn error_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
      .mount(&server)
      .await;

    let err = client_for(&server).generate("m", "p").await.unwrap_err();
    match err {
      GenerationError::Http { status, message } => {
        assert_eq!(status, 503);
        assert_eq!(message, "overloaded");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn error_line_in_stream_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ndjson(&[r#"{"response":"partial"}"#, r#"{"error":"model 'x' not found"}"#]))
      .mount(&server)
      .await;

    let err = client_for(&server).generate("x", "p").await.unwrap_err();
    assert!(matches!(err, GenerationError::Upstream(ref m) if m.contains("not found")));
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_network_error() {
    let cfg = AppConfig {
      generate_url: "http://127.0.0.1:9/api/generate".into(),
      request_timeout_secs: 2,
      ..AppConfig::default()
    };
    let err = OllamaClient::new(&cfg).unwrap().generate("m", "p").await.unwrap_err();
    assert!(matches!(err, GenerationError::Network(_) | GenerationError::Timeout(_)));
  }

  #[test]
  fn accumulator_handles_split_lines() {
    let mut acc = NdjsonAccumulator::default();
    acc.push_bytes(br#"{"respo"#).unwrap();
    acc.push_bytes(b"nse\":\"Hel\"}\n{\"response\":").unwrap();
    acc.push_bytes(br#""lo"}"#).unwrap();
    assert_eq!(acc.finish().unwrap(), "Hello");
  }

  #[test]
  fn long_line_in_tiny_chunks_is_scanned_once() {
    let body = "x".repeat(5000);
    let line = format!("{{\"response\":\"{body}\"}}\n{{\"response\":\"!\"}}");
    let mut acc = NdjsonAccumulator::default();
    for (i, chunk) in line.as_bytes().chunks(3).enumerate() {
      acc.push_bytes(chunk).unwrap();
      // Everything buffered has been checked for a newline already.
      assert_eq!(acc.scanned, acc.buf.len(), "chunk {i}");
    }
    assert_eq!(acc.finish().unwrap(), format!("{body}!"));
  }
}
