//! `GET /dbcheck` liveness check.

use axum::{Json, extract::State};
use serde::Serialize;
use wordpick_core::store::{StoreHealth, WordStore};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub ok:     bool,
  #[serde(flatten)]
  pub health: StoreHealth,
}

/// `GET /dbcheck`
pub async fn dbcheck<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<HealthResponse>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let health = state
    .store
    .health()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(HealthResponse { ok: true, health }))
}
