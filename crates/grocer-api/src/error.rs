//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Missing or wrong write PIN.
  #[error("unauthorized")]
  Unauthorized,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap and log a backend failure.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    tracing::error!(error = %e, "store operation failed");
    Self::Store(Box::new(e))
  }
}

impl From<grocer_core::Error> for ApiError {
  fn from(e: grocer_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
