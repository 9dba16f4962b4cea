//! Document summarization through the generation client.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use crate::llm::{GenerationClient, GenerationError};
use crate::util::fill_template;

/// Turns extracted document text into a short summary.
#[derive(Clone)]
pub struct Summarizer {
  client: Arc<dyn GenerationClient>,
  model: String,
  template: String,
}

impl Summarizer {
  pub fn new(client: Arc<dyn GenerationClient>, model: impl Into<String>, template: impl Into<String>) -> Self {
    Self { client, model: model.into(), template: template.into() }
  }

  #[instrument(level = "info", skip(self, text), fields(model = %self.model, text_len = text.len()))]
  pub async fn summarize(&self, text: &str) -> Result<String, GenerationError> {
    let prompt = fill_template(&self.template, &[("text", text)]);
    let start = Instant::now();
    let summary = self.client.generate(&self.model, &prompt).await?;
    info!(target: "quizgen", elapsed = ?start.elapsed(), summary_len = summary.len(), "Summary generated");
    Ok(summary.trim().to_string())
  }
}
