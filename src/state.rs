//! Application state: configuration plus the components built from it.
//!
//! Everything here is read-only after startup; handlers share it via `Arc`.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::exam::ExamOrchestrator;
use crate::generators::QuestionGenerator;
use crate::llm::{GenerationClient, GenerationError, OllamaClient};
use crate::summarizer::Summarizer;

pub struct AppState {
  pub config: AppConfig,
  pub summarizer: Summarizer,
  pub exam: ExamOrchestrator,
}

impl AppState {
  /// Build state with the real upstream client.
  #[instrument(level = "info", skip_all)]
  pub fn new(config: AppConfig) -> Result<Self, GenerationError> {
    let client = OllamaClient::new(&config)?;
    info!(target: "quizgen", url = %client.url, timeout_secs = client.timeout_secs, "Generation client ready");
    Ok(Self::with_client(config, Arc::new(client)))
  }

  pub fn with_client(config: AppConfig, client: Arc<dyn GenerationClient>) -> Self {
    let summarizer = Summarizer::new(client.clone(), &config.summary_model, &config.prompts.summary_template);
    let generator = QuestionGenerator::new(client, &config.question_model);
    let exam = ExamOrchestrator::new(generator, &config);
    Self { config, summarizer, exam }
  }
}
