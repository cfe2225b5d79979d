//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wordpick_core::pick::DAILY_LIMIT_MESSAGE;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  Validation(String),

  #[error("{}", DAILY_LIMIT_MESSAGE)]
  AlreadyPicked,

  #[error("not configured: {0}")]
  NotConfigured(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("upstream error: {0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<wordpick_core::Error> for ApiError {
  fn from(e: wordpick_core::Error) -> Self { ApiError::Validation(e.to_string()) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::AlreadyPicked => {
        (StatusCode::BAD_REQUEST, DAILY_LIMIT_MESSAGE.to_owned())
      }
      ApiError::NotConfigured(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        let body = Json(json!({ "error": "unauthorized" }));
        return (
          StatusCode::UNAUTHORIZED,
          [(header::WWW_AUTHENTICATE, r#"Basic realm="wordpick""#)],
          body,
        )
          .into_response();
      }
      ApiError::Upstream(m) => {
        tracing::warn!(error = %m, "upstream request failed");
        (StatusCode::BAD_GATEWAY, m.clone())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
