//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microseconds,
//! `Z` suffix) so that string comparison in SQL matches time order. String
//! lists are stored as compact JSON arrays. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;
use wordpick_core::{leaderboard::WordTotal, pick::PickSummary, word::WordEntry};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── String lists ────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `word_bank` row.
pub struct RawWord {
  pub word:     String,
  pub lang:     String,
  pub valence:  i8,
  pub energy:   u8,
  pub types:    String,
  pub domains:  String,
  pub tags:     String,
  pub synonyms: String,
}

impl RawWord {
  pub fn into_entry(self) -> Result<WordEntry> {
    Ok(WordEntry {
      word:     self.word,
      lang:     self.lang,
      valence:  self.valence,
      energy:   self.energy,
      types:    decode_list(&self.types)?,
      domains:  decode_list(&self.domains)?,
      tags:     decode_list(&self.tags)?,
      synonyms: decode_list(&self.synonyms)?,
    })
  }
}

/// Encoded columns for one `word_bank` upsert.
pub struct EncodedWord {
  pub word:     String,
  pub lang:     String,
  pub valence:  i8,
  pub energy:   u8,
  pub types:    String,
  pub domains:  String,
  pub tags:     String,
  pub synonyms: String,
}

impl EncodedWord {
  pub fn from_entry(entry: WordEntry) -> Result<Self> {
    Ok(Self {
      types:    encode_list(&entry.types)?,
      domains:  encode_list(&entry.domains)?,
      tags:     encode_list(&entry.tags)?,
      synonyms: encode_list(&entry.synonyms)?,
      word:     entry.word,
      lang:     entry.lang,
      valence:  entry.valence,
      energy:   entry.energy,
    })
  }
}

/// Raw strings read from a session history query.
pub struct RawPickSummary {
  pub word:       String,
  pub created_at: String,
}

impl RawPickSummary {
  pub fn into_summary(self) -> Result<PickSummary> {
    Ok(PickSummary {
      word:       self.word,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from the per-word totals query.
pub struct RawWordTotal {
  pub word:      String,
  pub total:     i64,
  pub last_seen: String,
}

impl RawWordTotal {
  pub fn into_total(self) -> Result<WordTotal> {
    Ok(WordTotal {
      word:      self.word,
      total:     self.total.max(0) as u64,
      last_seen: decode_dt(&self.last_seen)?,
    })
  }
}
