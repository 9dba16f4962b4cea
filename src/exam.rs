//! Exam assembly: one entry per requested spec, in request order.
//!
//! Specs are independent, so up to `concurrency` of them may be generated at
//! once; `buffered` keeps results in input order regardless of completion
//! order. With the default concurrency of 1 this is strictly sequential.

use futures::{stream, StreamExt, TryStreamExt};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::{BloomLevel, Difficulty, ExamEntry, ExamResult, QuestionKind, QuestionRecord, QuestionSpec};
use crate::generators::QuestionGenerator;
use crate::llm::GenerationError;

#[derive(Clone)]
pub struct ExamOrchestrator {
  generator: QuestionGenerator,
  max_quantity: u32,
  concurrency: usize,
}

impl ExamOrchestrator {
  pub fn new(generator: QuestionGenerator, cfg: &AppConfig) -> Self {
    Self {
      generator,
      max_quantity: cfg.max_quantity.max(1),
      concurrency: cfg.max_concurrent_generations.max(1),
    }
  }

  #[instrument(level = "info", skip(self, summary, specs), fields(summary_len = summary.len(), specs = specs.len(), concurrency = self.concurrency))]
  pub async fn build_exam(&self, summary: &str, specs: &[QuestionSpec]) -> Result<ExamResult, GenerationError> {
    // Collected up front so the stream closure has no borrowed argument.
    let pending: Vec<_> = specs
      .iter()
      .enumerate()
      .map(|(idx, spec)| self.run_spec(idx, summary, spec))
      .collect();
    let entries: ExamResult = stream::iter(pending)
      .buffered(self.concurrency)
      .try_collect()
      .await?;

    let total: usize = entries.iter().map(|e| e.questions.len()).sum();
    info!(target: "quizgen", entries = entries.len(), questions = total, "Exam assembled");
    Ok(entries)
  }

  async fn run_spec(&self, idx: usize, summary: &str, spec: &QuestionSpec) -> Result<ExamEntry, GenerationError> {
    let kind_raw = spec.kind.trim().to_lowercase();
    let bloom = BloomLevel::resolve(spec.bloom_level.as_deref());
    let difficulty = Difficulty::resolve(spec.difficulty.as_deref());
    let quantity = self.clamp_quantity(idx, spec.quantity);

    let g = &self.generator;
    let questions: Vec<QuestionRecord> = match kind_raw.parse::<QuestionKind>() {
      Ok(QuestionKind::MultipleChoice) => g.multiple_choice(summary, quantity, difficulty, bloom).await?,
      Ok(QuestionKind::TrueOrFalse) => g.true_or_false(summary, quantity, difficulty, bloom).await?,
      Ok(QuestionKind::Identification) => g.identification(summary, quantity, difficulty, bloom).await?,
      Ok(QuestionKind::OpenEnded) => g.open_ended(summary, quantity, difficulty, bloom).await?,
      Err(()) => {
        warn!(target: "quizgen", idx, kind = %kind_raw, "Unknown question type");
        let mut err = QuestionRecord::new();
        err.insert("error".into(), json!(format!("Unknown question type: {kind_raw}")));
        vec![err]
      }
    };

    Ok(ExamEntry { kind: kind_raw, bloom_level: bloom, questions })
  }

  /// Missing → 1; out-of-range values are pulled into `1..=max_quantity`.
  fn clamp_quantity(&self, idx: usize, raw: Option<i64>) -> u32 {
    match raw {
      None => 1,
      Some(n) if n < 1 => {
        warn!(target: "quizgen", idx, requested = n, "Quantity below 1; using 1");
        1
      }
      Some(n) if n > i64::from(self.max_quantity) => {
        warn!(target: "quizgen", idx, requested = n, max = self.max_quantity, "Quantity above limit; clamping");
        self.max_quantity
      }
      Some(n) => n as u32,
    }
  }
}
