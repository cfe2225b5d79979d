//! The `WordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `wordpick-store-sqlite`).
//! Higher layers (`wordpick-api`, `wordpick-cli`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  ingest::BulkOutcome,
  leaderboard::{LeaderboardRow, WordTotal},
  mood::MoodFilter,
  pick::{NewPick, PickSummary, RecordOutcome},
  word::WordEntry,
};

/// Answer of the liveness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
  /// The database clock.
  pub now:     String,
  /// Which database is open.
  pub db:      String,
  /// Engine version string.
  pub version: String,
}

/// Abstraction over a wordpick store backend.
///
/// Sessions and picks are append-only. Catalog words are written only via
/// [`WordStore::upsert_words`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sessions and picks ────────────────────────────────────────────────

  /// Create the session if it does not exist yet. Idempotent.
  fn touch_session(
    &self,
    session_id: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ensure the session exists, then append a pick.
  ///
  /// With `locked_since` set, a session that already has a pick at or after
  /// that instant gets [`RecordOutcome::DailyLimitReached`] and nothing is
  /// written.
  fn record_pick(
    &self,
    input: NewPick,
    locked_since: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<RecordOutcome, Self::Error>> + Send + '_;

  /// Total number of picks recorded by a session.
  fn count_picks(
    &self,
    session_id: String,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// A session's most recent picks, newest first.
  fn recent_picks(
    &self,
    session_id: String,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<PickSummary>, Self::Error>> + Send + '_;

  // ── Aggregates ────────────────────────────────────────────────────────

  /// Words ranked by pick count (descending, ties by word) among picks made
  /// at or after `since`.
  fn leaderboard(
    &self,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<LeaderboardRow>, Self::Error>> + Send + '_;

  /// Lifetime pick totals, largest first, ties most recently picked first.
  fn word_totals(
    &self,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<WordTotal>, Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Catalog words containing `needle` ignoring case, ordered by word.
  fn search_words(
    &self,
    needle: String,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// A random sample of catalog words matching `filter`.
  fn suggest_words(
    &self,
    filter: MoodFilter,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Upsert every entry keyed on `word`, in order, reporting how many rows
  /// were created versus overwritten.
  fn upsert_words(
    &self,
    entries: Vec<WordEntry>,
  ) -> impl Future<Output = Result<BulkOutcome, Self::Error>> + Send + '_;

  /// Stored words equal to any candidate when case is ignored.
  fn existing_words(
    &self,
    candidates: Vec<String>,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// The whole catalog (optionally one language), ordered by word ignoring
  /// case.
  fn list_words(
    &self,
    lang: Option<String>,
  ) -> impl Future<Output = Result<Vec<WordEntry>, Self::Error>> + Send + '_;

  // ── Health ────────────────────────────────────────────────────────────

  fn health(&self) -> impl Future<Output = Result<StoreHealth, Self::Error>> + Send + '_;
}
