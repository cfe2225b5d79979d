//! Bulk catalog upload and export.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/words/bulk` | JSON `{"rows":[...]}` or a `text/csv` body; `?dry=1` validates only |
//! | `GET`  | `/words/bulk` | `?lang=` filter, `?format=json\|csv` |

use axum::{
  Json,
  body::Bytes,
  extract::{Query, State},
  http::{HeaderMap, header},
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wordpick_core::{
  ingest::{BulkOutcome, DryRunReport, RawRow, normalize_rows},
  store::WordStore,
  word::WordEntry,
};

use crate::{ApiState, auth::AdminGate, error::ApiError};

// ─── Ingest ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IngestParams {
  pub dry: Option<String>,
}

impl IngestParams {
  fn is_dry(&self) -> bool {
    matches!(
      self.dry.as_deref().map(str::trim),
      Some("1" | "true" | "yes")
    )
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct IngestBody {
  #[serde(default)]
  pub rows: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
  pub ok:      bool,
  #[serde(flatten)]
  pub outcome: BulkOutcome,
}

#[derive(Debug, Serialize)]
pub struct DryRunResponse {
  pub ok:     bool,
  #[serde(flatten)]
  pub report: DryRunReport,
}

fn is_csv(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/csv"))
}

/// Decode the request body into raw rows. Non-object JSON rows are ignored.
fn read_rows(headers: &HeaderMap, body: &[u8]) -> Result<Vec<RawRow>, ApiError> {
  if is_csv(headers) {
    let text = std::str::from_utf8(body)
      .map_err(|_| ApiError::Validation("CSV body must be UTF-8".into()))?;
    return wordpick_csv::parse_rows(text).map_err(|e| ApiError::Validation(e.to_string()));
  }

  let parsed: IngestBody = if body.iter().all(u8::is_ascii_whitespace) {
    IngestBody::default()
  } else {
    serde_json::from_slice(body)
      .map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))?
  };
  Ok(
    parsed
      .rows
      .into_iter()
      .filter_map(|row| match row {
        Value::Object(map) => Some(RawRow(map)),
        _ => None,
      })
      .collect(),
  )
}

/// `POST /words/bulk[?dry=1]`
pub async fn ingest<S>(
  State(state): State<ApiState<S>>,
  _admin: AdminGate,
  Query(params): Query<IngestParams>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Response, ApiError>
where
  S: WordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = read_rows(&headers, &body)?;
  let entries = normalize_rows(&rows)?;

  if params.is_dry() {
    let candidates = entries.iter().map(|e| e.word.clone()).collect();
    let stored = state
      .store
      .existing_words(candidates)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    let report = DryRunReport::classify(&entries, &stored);
    tracing::info!(
      total = report.counts.total,
      new = report.counts.new,
      dup_exact = report.counts.dup_exact,
      dup_near = report.counts.dup_near,
      "bulk dry run"
    );
    return Ok(Json(DryRunResponse { ok: true, report }).into_response());
  }

  let outcome = state
    .store
    .upsert_words(entries)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(
    inserted = outcome.inserted,
    updated = outcome.updated,
    total = outcome.total,
    "bulk upsert complete"
  );
  Ok(Json(IngestResponse { ok: true, outcome }).into_response())
}

// ─── Export ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExportParams {
  pub lang:   Option<String>,
  pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
  pub rows: Vec<WordEntry>,
}

/// `GET /words/bulk[?lang=<code>&format=json|csv]`
pub async fn export<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ExportParams>,
) -> Result<Response, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let lang = params
    .lang
    .map(|l| l.trim().to_owned())
    .filter(|l| !l.is_empty());
  let rows = state
    .store
    .list_words(lang)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let csv = params
    .format
    .as_deref()
    .is_some_and(|f| f.trim().eq_ignore_ascii_case("csv"));
  if csv {
    let body = wordpick_csv::to_csv(&rows);
    return Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response());
  }
  Ok(Json(ExportResponse { rows }).into_response())
}
