use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("Upstream error: {0}")]
  UpstreamError(String),

  #[error("Decode error: {0}")]
  DecodeError(String),

  #[error("Validation error: {0}")]
  ValidationError(String),

  #[error("Config error: {0}")]
  ConfigError(String),

  #[error("Not found: {0}")]
  NotFoundError(String),

  #[error("Internal server error: {0}")]
  InternalError(String),
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
      Self::UpstreamError(err.to_string())
  }
}

impl AppError {
  /// Status and client-facing message. Inner details stay in the logs.
  pub fn status_and_message(&self) -> (StatusCode, &'static str) {
      match self {
          AppError::UpstreamError(_) | AppError::DecodeError(_) => {
              (StatusCode::BAD_GATEWAY, "failed to fetch prices")
          }
          AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "missing price id"),
          AppError::NotFoundError(_) => (StatusCode::NOT_FOUND, "price not found"),
          AppError::ConfigError(_) => (
              StatusCode::INTERNAL_SERVER_ERROR,
              "a configuration error occurred",
          ),
          AppError::InternalError(_) => (
              StatusCode::INTERNAL_SERVER_ERROR,
              "an internal server error occurred",
          ),
      }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
      let (status, error_message) = self.status_and_message();

      if status.is_server_error() {
          tracing::error!(error = %self, "request failed");
      } else {
          tracing::debug!(error = %self, "request rejected");
      }

      let body = Json(json!({
          "error": error_message,
      }));

      (status, body).into_response()
  }
}
