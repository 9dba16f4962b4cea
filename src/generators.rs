//! Question generators: prompt → model → parsed records.
//!
//! All four question kinds share one algorithm; only the prompt and the
//! placeholder shape differ. Content failures never escape this module (they
//! become a placeholder record); transport failures do.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};

use crate::domain::{BloomLevel, Difficulty, QuestionKind, QuestionRecord};
use crate::llm::{GenerationClient, GenerationError};
use crate::parse::{parse_question_array, ParseOutcome};
use crate::prompts::render_question_prompt;
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct QuestionGenerator {
  client: Arc<dyn GenerationClient>,
  model: String,
}

impl QuestionGenerator {
  pub fn new(client: Arc<dyn GenerationClient>, model: impl Into<String>) -> Self {
    Self { client, model: model.into() }
  }

  #[instrument(
    level = "info",
    skip(self, summary),
    fields(kind = kind.as_str(), %quantity, %difficulty, %bloom, summary_len = summary.len())
  )]
  pub async fn generate(
    &self,
    kind: QuestionKind,
    summary: &str,
    quantity: u32,
    difficulty: Difficulty,
    bloom: BloomLevel,
  ) -> Result<Vec<QuestionRecord>, GenerationError> {
    let prompt = render_question_prompt(kind, summary, quantity, difficulty, bloom);
    let raw = self.client.generate(&self.model, &prompt).await?;

    let outcome = parse_question_array(&raw);
    match &outcome {
      ParseOutcome::Parsed(q) => info!(target: "quizgen", outcome = outcome.label(), count = q.len(), "Questions generated"),
      ParseOutcome::Recovered(q) => warn!(target: "quizgen", outcome = outcome.label(), count = q.len(), "Questions salvaged from noisy response"),
      ParseOutcome::Failed { candidate_found } => warn!(
        target: "quizgen",
        outcome = outcome.label(),
        candidate_found,
        response = %trunc_for_log(&raw, 200),
        "Unusable model response; substituting placeholder"
      ),
    }

    Ok(match outcome {
      ParseOutcome::Parsed(q) | ParseOutcome::Recovered(q) => q,
      ParseOutcome::Failed { candidate_found } => vec![placeholder(kind, candidate_found)],
    })
  }

  pub async fn multiple_choice(&self, summary: &str, quantity: u32, difficulty: Difficulty, bloom: BloomLevel) -> Result<Vec<QuestionRecord>, GenerationError> {
    self.generate(QuestionKind::MultipleChoice, summary, quantity, difficulty, bloom).await
  }

  pub async fn true_or_false(&self, summary: &str, quantity: u32, difficulty: Difficulty, bloom: BloomLevel) -> Result<Vec<QuestionRecord>, GenerationError> {
    self.generate(QuestionKind::TrueOrFalse, summary, quantity, difficulty, bloom).await
  }

  pub async fn identification(&self, summary: &str, quantity: u32, difficulty: Difficulty, bloom: BloomLevel) -> Result<Vec<QuestionRecord>, GenerationError> {
    self.generate(QuestionKind::Identification, summary, quantity, difficulty, bloom).await
  }

  pub async fn open_ended(&self, summary: &str, quantity: u32, difficulty: Difficulty, bloom: BloomLevel) -> Result<Vec<QuestionRecord>, GenerationError> {
    self.generate(QuestionKind::OpenEnded, summary, quantity, difficulty, bloom).await
  }
}

/// Well-shaped stand-in record with "Error" markers in every field.
pub fn placeholder(kind: QuestionKind, candidate_found: bool) -> QuestionRecord {
  let question = if candidate_found { "Error parsing response" } else { "Error generating questions" };
  let v = match kind {
    QuestionKind::MultipleChoice => json!({
      "question": question,
      "options": ["A. Error", "B. Error", "C. Error", "D. Error"],
      "answer": "A",
      "explanation": "API error",
      "bloom_justification": "N/A",
    }),
    QuestionKind::TrueOrFalse => json!({
      "question": question,
      "answer": "True",
      "explanation": "API error",
      "bloom_justification": "N/A",
    }),
    QuestionKind::Identification => json!({
      "question": question,
      "answer": "Error",
      "explanation": "API error",
      "bloom_justification": "N/A",
    }),
    QuestionKind::OpenEnded => json!({
      "question": question,
      "answer": "Error",
      "key_points": ["API error"],
      "bloom_justification": "N/A",
      "grading_criteria": "N/A",
    }),
  };
  v.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::llm::testing::ScriptedClient;

  fn generator(client: ScriptedClient) -> (QuestionGenerator, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    (QuestionGenerator::new(client.clone(), "test-model"), client)
  }

  #[tokio::test]
  async fn returns_model_array_untouched() {
    let (g, client) = generator(ScriptedClient::constant(
      r#"[{"question": "Is a cat a mammal?", "answer": "True", "explanation": "Fur.", "bloom_justification": "Recall", "extra": 1}]"#,
    ));
    let q = g.true_or_false("Cats are mammals.", 1, Difficulty::Easy, BloomLevel::Remember).await.unwrap();
    assert_eq!(q.len(), 1);
    assert_eq!(q[0]["answer"], "True");
    assert_eq!(q[0]["extra"], 1);

    let calls = client.calls.lock().unwrap();
    assert_eq!(calls[0].0, "test-model");
    assert!(calls[0].1.contains("true/false questions at the Remember level"));
  }

  #[tokio::test]
  async fn unusable_response_yields_kind_shaped_placeholder() {
    let (g, _) = generator(ScriptedClient::constant("Here you go: [{\"question\": oops}]"));
    let q = g.multiple_choice("s", 3, Difficulty::Medium, BloomLevel::Apply).await.unwrap();
    assert_eq!(q.len(), 1);
    assert_eq!(q[0]["question"], "Error parsing response");
    assert_eq!(q[0]["options"].as_array().unwrap().len(), 4);
    assert_eq!(q[0]["answer"], "A");

    let (g, _) = generator(ScriptedClient::constant("no json here"));
    let q = g.open_ended("s", 1, Difficulty::Medium, BloomLevel::Apply).await.unwrap();
    assert_eq!(q[0]["question"], "Error generating questions");
    assert_eq!(q[0]["key_points"], json!(["API error"]));
    assert_eq!(q[0]["grading_criteria"], "N/A");
  }

  #[tokio::test]
  async fn transport_errors_propagate() {
    let (g, _) = generator(ScriptedClient::new(|_, _| Err(GenerationError::Network("refused".into()))));
    let err = g.identification("s", 1, Difficulty::Hard, BloomLevel::Create).await.unwrap_err();
    assert!(matches!(err, GenerationError::Network(_)));
  }

  mod over_stream {
    use super::*;
    use crate::config::AppConfig;
    use crate::llm::OllamaClient;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn streaming_generator(lines: &[&str]) -> (MockServer, QuestionGenerator) {
      let server = MockServer::start().await;
      Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(lines.join("\n")))
        .mount(&server)
        .await;
      let cfg = AppConfig {
        generate_url: format!("{}/api/generate", server.uri()),
        request_timeout_secs: 5,
        ..AppConfig::default()
      };
      let client = Arc::new(OllamaClient::new(&cfg).unwrap());
      (server, QuestionGenerator::new(client, "llama3.2:3b"))
    }

    #[tokio::test]
    async fn garbage_line_in_stream_still_yields_questions() {
      let (_server, g) = streaming_generator(&[
        r#"{"response":"[{\"question\": \"Is a cat a mammal?\", "}"#,
        "<<not json at all>>",
        r#"{"response":"\"answer\": \"True\"}]","done":true}"#,
      ])
      .await;

      let q = g.true_or_false("Cats are mammals.", 1, Difficulty::Easy, BloomLevel::Remember).await.unwrap();
      assert_eq!(q.len(), 1);
      assert_eq!(q[0]["question"], "Is a cat a mammal?");
      assert_eq!(q[0]["answer"], "True");
    }

    #[tokio::test]
    async fn garbage_only_stream_yields_placeholder() {
      let (_server, g) = streaming_generator(&[
        "<<not json at all>>",
        r#"{"response":"Sorry, I cannot write questions about that."}"#,
        "{truncated",
      ])
      .await;

      let q = g.identification("s", 2, Difficulty::Medium, BloomLevel::Understand).await.unwrap();
      assert_eq!(q.len(), 1);
      assert_eq!(q[0]["question"], "Error generating questions");
      assert_eq!(q[0]["answer"], "Error");
      assert_eq!(q[0]["bloom_justification"], "N/A");
    }
  }

  #[test]
  fn placeholders_share_common_fields() {
    for kind in [QuestionKind::MultipleChoice, QuestionKind::TrueOrFalse, QuestionKind::Identification, QuestionKind::OpenEnded] {
      let p = placeholder(kind, false);
      assert!(p.contains_key("question"), "{kind:?}");
      assert!(p.contains_key("answer"), "{kind:?}");
      assert_eq!(p["bloom_justification"], "N/A");
    }
  }
}
