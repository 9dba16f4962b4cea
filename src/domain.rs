//! Domain models: Bloom levels, difficulty tiers, question kinds, specs and exam entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cognitive level from Bloom's taxonomy, lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default)]
pub enum BloomLevel {
  Remember,
  #[default]
  Understand,
  Apply,
  Analyze,
  Evaluate,
  Create,
}

impl BloomLevel {
  pub const ALL: [BloomLevel; 6] = [
    BloomLevel::Remember,
    BloomLevel::Understand,
    BloomLevel::Apply,
    BloomLevel::Analyze,
    BloomLevel::Evaluate,
    BloomLevel::Create,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      BloomLevel::Remember => "Remember",
      BloomLevel::Understand => "Understand",
      BloomLevel::Apply => "Apply",
      BloomLevel::Analyze => "Analyze",
      BloomLevel::Evaluate => "Evaluate",
      BloomLevel::Create => "Create",
    }
  }

  /// Lenient parse: unknown or missing input resolves to `Understand`.
  pub fn resolve(raw: Option<&str>) -> Self {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
  }
}

impl FromStr for BloomLevel {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    BloomLevel::ALL
      .into_iter()
      .find(|l| l.as_str().eq_ignore_ascii_case(s))
      .ok_or(())
  }
}

impl fmt::Display for BloomLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Difficulty tier requested for a batch of questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
    }
  }

  /// Lenient parse: unknown or missing input resolves to `Medium`.
  pub fn resolve(raw: Option<&str>) -> Self {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
  }
}

impl FromStr for Difficulty {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Difficulty::ALL
      .into_iter()
      .find(|d| d.as_str().eq_ignore_ascii_case(s))
      .ok_or(())
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Which generator handles a spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestionKind {
  MultipleChoice,
  TrueOrFalse,
  Identification,
  OpenEnded,
}

impl QuestionKind {
  pub fn as_str(self) -> &'static str {
    match self {
      QuestionKind::MultipleChoice => "multiple_choice",
      QuestionKind::TrueOrFalse => "true_or_false",
      QuestionKind::Identification => "identification",
      QuestionKind::OpenEnded => "open_ended",
    }
  }
}

impl FromStr for QuestionKind {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "multiple_choice" => Ok(QuestionKind::MultipleChoice),
      "true_or_false" => Ok(QuestionKind::TrueOrFalse),
      "identification" => Ok(QuestionKind::Identification),
      "open_ended" => Ok(QuestionKind::OpenEnded),
      _ => Err(()),
    }
  }
}

/// One requested block of questions, as submitted by the caller.
/// `kind` stays a raw string so unknown types can be reported per entry.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionSpec {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default, deserialize_with = "lenient_label")]
  pub bloom_level: Option<String>,
  #[serde(default, deserialize_with = "lenient_label")]
  pub difficulty: Option<String>,
  #[serde(default, deserialize_with = "lenient_quantity")]
  pub quantity: Option<i64>,
}

#[cfg(test)]
impl QuestionSpec {
  pub fn new(kind: &str) -> Self {
    Self { kind: kind.to_string(), bloom_level: None, difficulty: None, quantity: None }
  }
}

/// Accepts `3`, `3.0` or `"3"`; anything else is treated as absent.
fn lenient_quantity<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let v = Option::<Value>::deserialize(de)?;
  Ok(match v {
    Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
    Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
    _ => None,
  })
}

/// Non-string labels (`3`, `["Hard"]`) are treated as absent so they fall
/// back to the default level instead of rejecting the request.
fn lenient_label<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
  D: serde::Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(de)? {
    Some(Value::String(s)) => Some(s),
    _ => None,
  })
}

/// A question as produced by the model. The field set depends on the kind and
/// is not validated, so the record is carried as a JSON object.
pub type QuestionRecord = Map<String, Value>;

/// One entry of the exam response, in the same position as its spec.
#[derive(Clone, Debug, Serialize)]
pub struct ExamEntry {
  #[serde(rename = "type")]
  pub kind: String,
  pub bloom_level: BloomLevel,
  pub questions: Vec<QuestionRecord>,
}

pub type ExamResult = Vec<ExamEntry>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_levels_fall_back_to_defaults() {
    assert_eq!(BloomLevel::resolve(Some("Nonsense")), BloomLevel::Understand);
    assert_eq!(BloomLevel::resolve(None), BloomLevel::Understand);
    assert_eq!(Difficulty::resolve(Some("Nonsense")), Difficulty::Medium);
    assert_eq!(Difficulty::resolve(None), Difficulty::Medium);
  }

  #[test]
  fn level_parsing_ignores_case_and_padding() {
    assert_eq!(BloomLevel::resolve(Some(" analyze ")), BloomLevel::Analyze);
    assert_eq!(Difficulty::resolve(Some("HARD")), Difficulty::Hard);
  }

  #[test]
  fn spec_accepts_loose_quantity_forms() {
    let specs: Vec<QuestionSpec> = serde_json::from_value(serde_json::json!([
      {"type": "identification", "quantity": 3},
      {"type": "identification", "quantity": "4"},
      {"type": "identification", "quantity": null},
      {"type": "identification"}
    ]))
    .unwrap();
    let q: Vec<_> = specs.iter().map(|s| s.quantity).collect();
    assert_eq!(q, vec![Some(3), Some(4), None, None]);
  }

  #[test]
  fn non_string_levels_resolve_to_defaults() {
    let specs: Vec<QuestionSpec> = serde_json::from_value(serde_json::json!([
      {"type": "identification", "bloom_level": 3, "difficulty": ["Hard"]},
      {"type": "identification", "bloom_level": {"name": "Apply"}, "difficulty": null},
      {"type": "identification", "bloom_level": "Apply", "difficulty": "hard"}
    ]))
    .unwrap();
    assert_eq!(specs[0].bloom_level, None);
    assert_eq!(BloomLevel::resolve(specs[0].bloom_level.as_deref()), BloomLevel::Understand);
    assert_eq!(Difficulty::resolve(specs[0].difficulty.as_deref()), Difficulty::Medium);
    assert_eq!(BloomLevel::resolve(specs[1].bloom_level.as_deref()), BloomLevel::Understand);
    assert_eq!(BloomLevel::resolve(specs[2].bloom_level.as_deref()), BloomLevel::Apply);
    assert_eq!(Difficulty::resolve(specs[2].difficulty.as_deref()), Difficulty::Hard);
  }

  #[test]
  fn entry_serializes_with_type_key() {
    let e = ExamEntry { kind: "essay".into(), bloom_level: BloomLevel::Apply, questions: vec![] };
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["type"], "essay");
    assert_eq!(v["bloom_level"], "Apply");
  }
}
