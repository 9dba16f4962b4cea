//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::QuestionSpec;

#[derive(Serialize)]
pub struct SummarizeOut {
  pub summary: String,
  #[serde(rename = "fileType")]
  pub file_type: String,
}

/// Both fields are optional here so a missing one can be reported with the
/// service's own message instead of a serde rejection.
#[derive(Debug, Deserialize)]
pub struct GenerateIn {
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub questions: Option<Vec<QuestionSpec>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
  pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}
