//! Time windows, leaderboard rows and word-wall weighting.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_LIMIT: u32 = 10;
pub const WALL_LIMIT: u32 = 100;

// ─── Period ──────────────────────────────────────────────────────────────────

/// Aggregation window for the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
  #[default]
  Today,
  Week,
  All,
}

impl Period {
  pub fn key(self) -> &'static str {
    match self {
      Self::Today => "today",
      Self::Week => "week",
      Self::All => "all",
    }
  }

  /// Case-insensitive lookup; missing or unrecognised input means
  /// [`Period::Today`].
  pub fn resolve(raw: Option<&str>) -> Self {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
      Some("week") => Self::Week,
      Some("all") => Self::All,
      _ => Self::Today,
    }
  }

  /// Earliest `created_at` included in the window, or `None` for no bound.
  ///
  /// `Today` starts at midnight in the zone of `now`; `Week` is the last
  /// seven 24-hour days.
  pub fn since<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    match self {
      Self::Today => Some(start_of_day(now)),
      Self::Week => Some(now.with_timezone(&Utc) - Duration::days(7)),
      Self::All => None,
    }
  }
}

/// Midnight of the calendar day containing `now`, in `now`'s zone.
///
/// When midnight does not exist locally (a DST jump), the first valid hour
/// after it is used.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
  let midnight = now.date_naive().and_time(NaiveTime::MIN);
  let tz = now.timezone();
  (0..=2)
    .find_map(|h| {
      tz.from_local_datetime(&(midnight + Duration::hours(h)))
        .earliest()
    })
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|| now.with_timezone(&Utc))
}

// ─── Rows ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
  pub word:  String,
  pub picks: u64,
}

/// Lifetime pick count for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTotal {
  pub word:      String,
  pub total:     u64,
  pub last_seen: DateTime<Utc>,
}

/// One entry of the client word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallItem {
  pub word:         String,
  pub weight:       u32,
  pub is_highlight: bool,
}

/// Logarithmic display weight: `max(1, round(log10(total + 1) * 8))`.
pub fn wall_weight(total: u64) -> u32 {
  ((total as f64 + 1.0).log10() * 8.0).round().max(1.0) as u32
}

impl WallItem {
  /// Build cloud entries, flagging the word equal to `highlight` (ignoring
  /// case).
  pub fn from_totals(totals: Vec<WordTotal>, highlight: Option<&str>) -> Vec<Self> {
    let highlight = highlight
      .map(|h| h.trim().to_lowercase())
      .filter(|h| !h.is_empty());
    totals
      .into_iter()
      .map(|t| WallItem {
        is_highlight: highlight.as_deref() == Some(t.word.to_lowercase().as_str()),
        weight:       wall_weight(t.total),
        word:         t.word,
      })
      .collect()
  }
}
