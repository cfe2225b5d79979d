//! Handler for `POST /session`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use wordpick_core::store::WordStore;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchBody {
  pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
  pub ok: bool,
}

/// `POST /session`, body: `{"sessionId":"..."}`
pub async fn touch<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<TouchBody>, JsonRejection>,
) -> Result<Json<Ack>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let session_id = body
    .session_id
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::Validation("Missing sessionId".into()))?;

  state
    .store
    .touch_session(session_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Ack { ok: true }))
}
