//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Ledger(#[from] tally_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use tally_core::Error as Core;

    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Ledger(Core::Unauthorized(_)) => StatusCode::FORBIDDEN,
      ApiError::Ledger(Core::AlreadyRecorded { .. })
      | ApiError::Ledger(Core::AlreadyWitnessed { .. }) => StatusCode::CONFLICT,
      ApiError::Ledger(Core::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
