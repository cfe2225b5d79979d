//! Picks, the append-only ledger of words chosen by sessions.
//!
//! A pick is never updated or deleted once written. Sessions are anonymous
//! client-generated identifiers and carry no data beyond their creation time.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  streak::{HISTORY_LIMIT, pick_days, streak},
};

// ─── Policy ──────────────────────────────────────────────────────────────────

/// How many picks a session may record per server-local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPolicy {
  #[default]
  Unlimited,
  OnePerDay,
}

/// Message shown when [`PickPolicy::OnePerDay`] refuses a pick.
pub const DAILY_LIMIT_MESSAGE: &str =
  "You already locked a word today. Join to unlock more.";

// ─── NewPick ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WordStore::record_pick`].
/// `created_at` and the pick id are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPick {
  pub session_id: String,
  pub word:       String,
  /// Self-reported mood, nominally 1–5. Stored as given.
  pub mood:       Option<i64>,
  pub note:       Option<String>,
  pub tags:       Option<Vec<String>>,
}

impl NewPick {
  /// Validate the required fields. Both are trimmed and must be non-empty.
  pub fn new(session_id: &str, word: &str) -> Result<Self> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
      return Err(Error::MissingField("sessionId"));
    }
    let word = word.trim();
    if word.is_empty() {
      return Err(Error::MissingField("word"));
    }
    Ok(Self {
      session_id: session_id.to_owned(),
      word:       word.to_owned(),
      mood:       None,
      note:       None,
      tags:       None,
    })
  }
}

// ─── Pick ────────────────────────────────────────────────────────────────────

/// A persisted pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
  pub pick_id:    Uuid,
  pub session_id: String,
  pub word:       String,
  pub mood:       Option<i64>,
  pub note:       Option<String>,
  pub tags:       Option<Vec<String>>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// Result of asking the store to record a pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
  Recorded(Pick),
  /// The session already picked inside the locked window; nothing written.
  DailyLimitReached,
}

/// The word and time of a pick, as listed in session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSummary {
  pub word:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Session stats ───────────────────────────────────────────────────────────

/// Per-session totals returned by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
  pub total:     u64,
  pub last_pick: Option<PickSummary>,
  pub streak:    u32,
}

impl SessionStats {
  /// Derive stats from the total pick count and the session's most recent
  /// picks (newest first, at most [`HISTORY_LIMIT`] are considered).
  ///
  /// Calendar days are taken in the time zone of `now`.
  pub fn from_history<Tz: TimeZone>(
    total: u64,
    recent: Vec<PickSummary>,
    now: &DateTime<Tz>,
  ) -> Self {
    let tz = now.timezone();
    let days = pick_days(
      recent
        .iter()
        .take(HISTORY_LIMIT as usize)
        .map(|p| p.created_at),
      &tz,
    );
    Self {
      total,
      streak: streak(now.date_naive(), &days),
      last_pick: recent.into_iter().next(),
    }
  }
}
