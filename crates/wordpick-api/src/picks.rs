//! Handlers for recording picks and reading a session's stats.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/pick`  | Body: `{"sessionId","word","mood"?,"note"?,"tags"?}` |
//! | `GET`  | `/stats` | `?sessionId=` required |

use axum::{
  Json,
  extract::{Query, State, rejection::JsonRejection},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use wordpick_core::{
  leaderboard::start_of_day,
  pick::{NewPick, PickPolicy, RecordOutcome, SessionStats},
  store::WordStore,
  streak::HISTORY_LIMIT,
};

use crate::{ApiState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickBody {
  pub session_id: Option<String>,
  pub word:       Option<String>,
  /// A number or a numeric string.
  pub mood:       Option<Value>,
  pub note:       Option<String>,
  pub tags:       Option<Vec<String>>,
}

fn parse_mood(raw: Option<Value>) -> Result<Option<i64>, ApiError> {
  let invalid = || ApiError::Validation("mood must be a number".into());
  match raw {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => n
      .as_i64()
      .or_else(|| n.as_f64().map(|f| f.round() as i64))
      .map(Some)
      .ok_or_else(invalid),
    Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
    Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
    Some(_) => Err(invalid()),
  }
}

#[derive(Debug, Serialize)]
pub struct PickCreated {
  pub ok: bool,
  pub id: Uuid,
}

/// `POST /pick`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<PickBody>, JsonRejection>,
) -> Result<Json<PickCreated>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let mut input = NewPick::new(
    body.session_id.as_deref().unwrap_or_default(),
    body.word.as_deref().unwrap_or_default(),
  )?;
  input.mood = parse_mood(body.mood)?;
  input.note = body.note;
  input.tags = body.tags;

  let locked_since = match state.settings.pick_policy {
    PickPolicy::Unlimited => None,
    PickPolicy::OnePerDay => Some(start_of_day(&Local::now())),
  };

  let outcome = state
    .store
    .record_pick(input, locked_since)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  match outcome {
    RecordOutcome::Recorded(pick) => {
      tracing::debug!(session = %pick.session_id, word = %pick.word, "pick recorded");
      Ok(Json(PickCreated { ok: true, id: pick.pick_id }))
    }
    RecordOutcome::DailyLimitReached => Err(ApiError::AlreadyPicked),
  }
}

// ─── Stats ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
  pub session_id: Option<String>,
}

/// `GET /stats?sessionId=<id>`
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<SessionStats>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let session_id = params
    .session_id
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| ApiError::Validation("Missing sessionId".into()))?;

  let total = state
    .store
    .count_picks(session_id.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let recent = state
    .store
    .recent_picks(session_id, HISTORY_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(SessionStats::from_history(total, recent, &Local::now())))
}
