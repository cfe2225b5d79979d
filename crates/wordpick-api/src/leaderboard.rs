//! Handlers for the ranked views: `GET /leaderboard` and `GET /wordwall`.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use wordpick_core::{
  leaderboard::{LEADERBOARD_LIMIT, LeaderboardRow, Period, WALL_LIMIT, WallItem},
  store::WordStore,
};

use crate::{ApiState, error::ApiError};

// ─── Leaderboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
  pub period: Period,
  pub rows:   Vec<LeaderboardRow>,
}

/// `GET /leaderboard[?period=today|week|all]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let period = Period::resolve(params.period.as_deref());
  let rows = state
    .store
    .leaderboard(period.since(&Local::now()), LEADERBOARD_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(LeaderboardResponse { period, rows }))
}

// ─── Word wall ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WallParams {
  pub highlight: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WallResponse {
  pub words: Vec<WallItem>,
}

/// `GET /wordwall[?highlight=<word>]`
pub async fn wall<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<WallParams>,
) -> Result<Json<WallResponse>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let totals = state
    .store
    .word_totals(WALL_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let words = WallItem::from_totals(totals, params.highlight.as_deref());
  Ok(Json(WallResponse { words }))
}
