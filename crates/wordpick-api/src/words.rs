//! Catalog lookups: `GET /words/search` and `GET /words/suggest`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use wordpick_core::{
  mood::{MoodState, suggestion_count},
  store::WordStore,
};

use crate::{ApiState, error::ApiError};

/// Upper bound on search results.
pub const SEARCH_LIMIT: u32 = 25;

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WordList {
  pub words: Vec<String>,
}

/// `GET /words/search?q=<text>`. A blank `q` yields an empty list.
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<WordList>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let needle = params.q.as_deref().unwrap_or_default().trim();
  if needle.is_empty() {
    return Ok(Json(WordList { words: Vec::new() }));
  }

  let words = state
    .store
    .search_words(needle.to_owned(), SEARCH_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(WordList { words }))
}

// ─── Suggest ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
  pub state: Option<String>,
  pub n:     Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Suggestions {
  pub state: MoodState,
  pub words: Vec<String>,
}

/// `GET /words/suggest[?state=<mood>&n=<count>]`
pub async fn suggest<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SuggestParams>,
) -> Result<Json<Suggestions>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mood = MoodState::resolve(params.state.as_deref());
  let limit = suggestion_count(params.n.as_deref());

  let words = state
    .store
    .suggest_words(mood.filter(), limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Suggestions { state: mood, words }))
}
