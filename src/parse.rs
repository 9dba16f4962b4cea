//! Coercing free-form model output into a JSON array of question objects.
//!
//! Three outcomes, made explicit so callers (and tests) can tell them apart:
//! the text parsed as-is, an array was salvaged from surrounding chatter, or
//! nothing usable was found and the caller should substitute a placeholder.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::QuestionRecord;

#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
  Parsed(Vec<QuestionRecord>),
  Recovered(Vec<QuestionRecord>),
  /// `candidate_found` is true when something array-shaped was located but
  /// did not parse.
  Failed { candidate_found: bool },
}

impl ParseOutcome {
  pub fn label(&self) -> &'static str {
    match self {
      ParseOutcome::Parsed(_) => "parsed",
      ParseOutcome::Recovered(_) => "recovered",
      ParseOutcome::Failed { .. } => "failed",
    }
  }
}

fn array_pattern() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // Greedy on purpose: first `[ {` to last `} ]`.
  RE.get_or_init(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("static regex"))
}

pub fn parse_question_array(text: &str) -> ParseOutcome {
  if let Some(records) = as_records(serde_json::from_str::<Value>(text.trim()).ok()) {
    return ParseOutcome::Parsed(records);
  }

  let candidate = array_pattern().find(text);
  if let Some(m) = candidate {
    if let Some(records) = as_records(serde_json::from_str::<Value>(m.as_str()).ok()) {
      return ParseOutcome::Recovered(records);
    }
  }

  if let Some(records) = scan_for_array(text) {
    return ParseOutcome::Recovered(records);
  }

  ParseOutcome::Failed { candidate_found: candidate.is_some() }
}

/// Stricter pass: try a streaming deserializer at every `[` and keep the
/// first complete array of objects. Handles trailing chatter that contains
/// brackets, which defeats the greedy pattern.
fn scan_for_array(text: &str) -> Option<Vec<QuestionRecord>> {
  text.match_indices('[').find_map(|(i, _)| {
    let mut it = serde_json::Deserializer::from_str(&text[i..]).into_iter::<Value>();
    as_records(it.next().and_then(Result::ok))
  })
}

/// A lone object counts as a one-question array. In an array, non-object
/// elements are dropped; the result must still hold at least one object.
fn as_records(v: Option<Value>) -> Option<Vec<QuestionRecord>> {
  let items = match v? {
    Value::Object(map) => return Some(vec![map]),
    Value::Array(items) => items,
    _ => return None,
  };
  let total = items.len();
  let records: Vec<Map<String, Value>> = items
    .into_iter()
    .filter_map(|item| match item {
      Value::Object(map) => Some(map),
      _ => None,
    })
    .collect();
  if records.is_empty() {
    return None;
  }
  if records.len() < total {
    warn!(target: "quizgen", kept = records.len(), dropped = total - records.len(), "Dropped non-object array elements");
  }
  Some(records)
}
