//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs sizes and outcomes, not contents.

use std::sync::Arc;

use axum::{
  extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument, warn};

use crate::domain::ExamResult;
use crate::error::ApiError;
use crate::extract::{extract_path, DocumentFormat};
use crate::protocol::*;
use crate::state::AppState;
use crate::taxonomy::guidance_table;
use crate::upload::with_scoped_upload;
use crate::util::file_extension;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

/// Bloom and difficulty guidance, for building level pickers.
pub async fn http_get_taxonomy() -> impl IntoResponse { Json(guidance_table()) }

struct Upload {
  filename: String,
  extension: String,
  format: DocumentFormat,
  bytes: Vec<u8>,
}

#[instrument(level = "info", skip(state, multipart))]
pub async fn http_post_summarize(
  State(state): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<Json<SummarizeOut>, ApiError> {
  let cfg = &state.config;
  let upload = read_upload(&state, &mut multipart).await?;
  info!(target: "quizgen", filename = %upload.filename, bytes = upload.bytes.len(), ext = %upload.extension, "Upload accepted");

  let Upload { extension, format, bytes, .. } = upload;
  let ext = extension.clone();
  let text = tokio::task::spawn_blocking(move || with_scoped_upload(&bytes, &ext, |path| extract_path(path, format)))
    .await
    .map_err(|e| ApiError::Processing(e.to_string()))?
    .map_err(|e| ApiError::Processing(e.to_string()))?;

  if text.trim().chars().count() < cfg.min_extracted_chars {
    warn!(target: "quizgen", chars = text.trim().len(), "Extracted text too short");
    return Err(ApiError::InsufficientText);
  }

  let summary = state
    .summarizer
    .summarize(&text)
    .await
    .map_err(|e| ApiError::Processing(e.to_string()))?;

  info!(target: "quizgen", text_len = text.len(), summary_len = summary.len(), "HTTP summarize served");
  Ok(Json(SummarizeOut { summary, file_type: extension }))
}

/// Find the `file` field and validate name, extension and size before any
/// processing happens.
async fn read_upload(state: &AppState, multipart: &mut Multipart) -> Result<Upload, ApiError> {
  let cfg = &state.config;
  let max = cfg.max_upload_bytes;

  while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, max))? {
    if field.name() != Some("file") {
      continue;
    }
    let filename = match field.file_name() {
      None => return Err(ApiError::NoFile),
      Some("") => return Err(ApiError::EmptyFilename),
      Some(name) => name.to_string(),
    };

    let extension = file_extension(&filename)
      .filter(|ext| cfg.is_allowed_extension(ext))
      .ok_or(ApiError::UnsupportedType)?;
    // Allow-listed extensions without a dedicated parser are read as text.
    let format = DocumentFormat::from_extension(&extension).unwrap_or(DocumentFormat::PlainText);

    let bytes = field.bytes().await.map_err(|e| multipart_error(e, max))?;
    if bytes.len() > max {
      warn!(target: "quizgen", %filename, bytes = bytes.len(), max, "Upload too large");
      return Err(ApiError::TooLarge(max));
    }
    return Ok(Upload { filename, extension, format, bytes: bytes.to_vec() });
  }
  Err(ApiError::NoFile)
}

fn multipart_error(e: MultipartError, max: usize) -> ApiError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    ApiError::TooLarge(max)
  } else {
    ApiError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
  }
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_generate(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<GenerateIn>, JsonRejection>,
) -> Result<Json<ExamResult>, ApiError> {
  let Json(body) = payload.map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
  let (Some(summary), Some(questions)) = (body.summary, body.questions) else {
    return Err(ApiError::MissingFields);
  };

  let exam = state.exam.build_exam(&summary, &questions).await?;
  info!(target: "quizgen", specs = questions.len(), entries = exam.len(), "HTTP generate served");
  Ok(Json(exam))
}
