//! Service configuration: TOML file (optional) + environment overrides.
//!
//! The file is named by QUIZGEN_CONFIG_PATH. Every field has a default, so an
//! empty file (or none at all) yields a working config. See `AppConfig`.

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_GENERATE_URL: &str = "https://ollama-y2elcua3ga-uc.a.run.app/api/generate";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub port: u16,
  /// Upstream `/api/generate` endpoint (NDJSON streaming).
  pub generate_url: String,
  pub summary_model: String,
  pub question_model: String,
  /// Overall per-call timeout for the upstream model.
  pub request_timeout_secs: u64,
  pub max_upload_bytes: usize,
  pub allowed_extensions: Vec<String>,
  /// Extracted text shorter than this (after trimming) is rejected.
  pub min_extracted_chars: usize,
  /// Upper bound for a spec's `quantity`.
  pub max_quantity: u32,
  /// 1 = strictly sequential exam generation.
  pub max_concurrent_generations: usize,
  pub static_dir: String,
  pub prompts: Prompts,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: 10000,
      generate_url: DEFAULT_GENERATE_URL.into(),
      summary_model: DEFAULT_MODEL.into(),
      question_model: DEFAULT_MODEL.into(),
      request_timeout_secs: 300,
      max_upload_bytes: 16 * 1024 * 1024,
      allowed_extensions: vec!["txt".into(), "pdf".into(), "docx".into()],
      min_extracted_chars: 10,
      max_quantity: 20,
      max_concurrent_generations: 1,
      static_dir: "./static".into(),
      prompts: Prompts::default(),
    }
  }
}

/// Prompt templates that can be tuned without a rebuild.
/// Question prompts are assembled in `prompts.rs` from the guidance table.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  /// `{text}` is replaced with the extracted document text.
  pub summary_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      summary_template: "\nSummarize the following content clearly and concisely in 3-5 sentences:\n\n{text}\n".into(),
    }
  }
}

impl AppConfig {
  /// Load from QUIZGEN_CONFIG_PATH (if set) and apply env overrides.
  /// A broken config file is logged and ignored rather than aborting startup.
  pub fn load() -> Self {
    let mut cfg = load_file_from_env().unwrap_or_default();
    cfg.apply_env(|k| std::env::var(k).ok());
    cfg.sanitize();
    info!(
      target: "quizgen",
      port = cfg.port,
      generate_url = %cfg.generate_url,
      summary_model = %cfg.summary_model,
      question_model = %cfg.question_model,
      max_concurrent = cfg.max_concurrent_generations,
      "Configuration loaded"
    );
    cfg
  }

  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    let mut cfg: AppConfig = toml::from_str(s)?;
    cfg.sanitize();
    Ok(cfg)
  }

  fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, get: F) {
    if let Some(p) = get("PORT").and_then(|v| v.parse().ok()) { self.port = p; }
    if let Some(v) = get("GENERATE_URL") { self.generate_url = v; }
    if let Some(v) = get("SUMMARY_MODEL") { self.summary_model = v; }
    if let Some(v) = get("QUESTION_MODEL") { self.question_model = v; }
    if let Some(v) = get("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) { self.request_timeout_secs = v; }
    if let Some(v) = get("MAX_CONCURRENT_GENERATIONS").and_then(|v| v.parse().ok()) { self.max_concurrent_generations = v; }
    if let Some(v) = get("STATIC_DIR") { self.static_dir = v; }
  }

  fn sanitize(&mut self) {
    if self.max_concurrent_generations == 0 {
      warn!(target: "quizgen", "max_concurrent_generations = 0; using 1");
      self.max_concurrent_generations = 1;
    }
    if self.max_quantity == 0 {
      warn!(target: "quizgen", "max_quantity = 0; using 1");
      self.max_quantity = 1;
    }
    for ext in &mut self.allowed_extensions {
      *ext = ext.trim_start_matches('.').to_ascii_lowercase();
    }
  }

  pub fn is_allowed_extension(&self, ext: &str) -> bool {
    self.allowed_extensions.iter().any(|a| a == ext)
  }
}

fn load_file_from_env() -> Option<AppConfig> {
  let path = std::env::var("QUIZGEN_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match AppConfig::from_toml(&s) {
      Ok(cfg) => {
        info!(target: "quizgen", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizgen", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizgen", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn empty_toml_gives_defaults() {
    let cfg = AppConfig::from_toml("").unwrap();
    assert_eq!(cfg.port, 10000);
    assert_eq!(cfg.max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(cfg.min_extracted_chars, 10);
    assert!(cfg.is_allowed_extension("docx"));
    assert!(!cfg.is_allowed_extension("exe"));
    assert!(cfg.prompts.summary_template.contains("{text}"));
  }

  #[test]
  fn toml_overrides_and_normalizes() {
    let cfg = AppConfig::from_toml(
      r#"
        question_model = "qwen2.5:7b"
        allowed_extensions = [".TXT", "md"]
        max_concurrent_generations = 0

        [prompts]
        summary_template = "Short: {text}"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.question_model, "qwen2.5:7b");
    assert_eq!(cfg.summary_model, DEFAULT_MODEL);
    assert_eq!(cfg.allowed_extensions, vec!["txt", "md"]);
    assert_eq!(cfg.max_concurrent_generations, 1);
    assert_eq!(cfg.prompts.summary_template, "Short: {text}");
  }

  #[test]
  fn env_overrides_take_precedence() {
    let env: HashMap<&str, &str> = [
      ("PORT", "8080"),
      ("GENERATE_URL", "http://localhost:11434/api/generate"),
      ("MAX_CONCURRENT_GENERATIONS", "4"),
      ("REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]
    .into_iter()
    .collect();
    let mut cfg = AppConfig::default();
    cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.generate_url, "http://localhost:11434/api/generate");
    assert_eq!(cfg.max_concurrent_generations, 4);
    assert_eq!(cfg.request_timeout_secs, 300);
  }
}
