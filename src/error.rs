//! HTTP-facing error type. Every variant renders as `{"error": "..."}`.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;
use tracing::error;

use crate::llm::GenerationError;
use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("No file uploaded.")]
  NoFile,

  #[error("No file selected.")]
  EmptyFilename,

  #[error("File type not supported. Please upload a txt, pdf, or docx file.")]
  UnsupportedType,

  #[error("File exceeds the maximum upload size of {0} bytes.")]
  TooLarge(usize),

  #[error("Could not extract sufficient text from the file.")]
  InsufficientText,

  #[error("Missing required fields: 'summary' and 'questions'")]
  MissingFields,

  #[error("{0}")]
  BadRequest(String),

  #[error("Error processing file: {0}")]
  Processing(String),

  #[error("{0}")]
  Generation(#[from] GenerationError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NoFile
      | ApiError::EmptyFilename
      | ApiError::UnsupportedType
      | ApiError::InsufficientText
      | ApiError::MissingFields
      | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Processing(_) | ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(target: "quizgen", %status, error = %self, "Request failed");
    }
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}
