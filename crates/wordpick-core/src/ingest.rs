//! Bulk ingestion: raw uploaded rows → normalised [`WordEntry`] values.
//!
//! Rows arrive either as JSON objects or as CSV records (every cell a
//! string). Both shapes are carried as a [`RawRow`] and go through the same
//! normalisation:
//!
//! - `word` (or `Word`) is trimmed; rows with an empty word are dropped.
//! - `lang` (or `language`) defaults to `"en"`.
//! - `valence`/`energy` accept numbers or numeric strings; anything missing,
//!   blank or unparseable takes the default before rounding and clamping.
//! - list fields accept a JSON array or a string split on `,` `;` `|`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  word::{DEFAULT_ENERGY, DEFAULT_LANG, DEFAULT_VALENCE, WordEntry, clamp_energy, clamp_valence},
};

const LIST_DELIMITERS: [char; 3] = [',', ';', '|'];

// ─── RawRow ──────────────────────────────────────────────────────────────────

/// One uploaded row before validation; keys are column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(pub Map<String, Value>);

impl RawRow {
  /// Build a row of string cells, e.g. from a CSV record.
  pub fn from_cells<I, K, V>(cells: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self(
      cells
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect(),
    )
  }

  /// The first of `keys` holding a usable value. `null` and blank strings
  /// count as absent.
  fn lookup(&self, keys: &[&str]) -> Option<&Value> {
    keys.iter().filter_map(|k| self.0.get(*k)).find(|v| match v {
      Value::Null => false,
      Value::String(s) => !s.trim().is_empty(),
      _ => true,
    })
  }
}

// ─── Scalar coercion ─────────────────────────────────────────────────────────

fn scalar_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn scalar_number(value: &Value) -> Option<f64> {
  let number = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
    _ => None,
  };
  number.filter(|n| n.is_finite())
}

/// Normalise a list-valued field.
///
/// Arrays keep their scalar elements; any other scalar is split on
/// [`LIST_DELIMITERS`]. Entries are trimmed and blanks dropped.
pub fn split_list(value: Option<&Value>) -> Vec<String> {
  let pieces: Vec<String> = match value {
    None | Some(Value::Null) => return Vec::new(),
    Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
    Some(other) => match scalar_text(other) {
      Some(text) => text.split(LIST_DELIMITERS).map(str::to_owned).collect(),
      None => return Vec::new(),
    },
  };

  pieces
    .into_iter()
    .map(|p| p.trim().to_owned())
    .filter(|p| !p.is_empty())
    .collect()
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Normalise one row. Returns `None` when the row has no usable word.
pub fn normalize_row(row: &RawRow) -> Option<WordEntry> {
  let word = row
    .lookup(&["word", "Word"])
    .and_then(scalar_text)
    .map(|w| w.trim().to_owned())
    .filter(|w| !w.is_empty())?;

  let lang = row
    .lookup(&["lang", "language"])
    .and_then(scalar_text)
    .map(|l| l.trim().to_owned())
    .filter(|l| !l.is_empty())
    .unwrap_or_else(|| DEFAULT_LANG.to_owned());

  let valence = row
    .lookup(&["valence"])
    .and_then(scalar_number)
    .map(clamp_valence)
    .unwrap_or(DEFAULT_VALENCE);

  let energy = row
    .lookup(&["energy"])
    .and_then(scalar_number)
    .map(clamp_energy)
    .unwrap_or(DEFAULT_ENERGY);

  Some(WordEntry {
    word,
    lang,
    valence,
    energy,
    types: split_list(row.0.get("types")),
    domains: split_list(row.0.get("domains")),
    tags: split_list(row.0.get("tags")),
    synonyms: split_list(row.0.get("synonyms")),
  })
}

/// Normalise a whole upload.
///
/// Fails with [`Error::EmptyBatch`] when `rows` is empty and with
/// [`Error::NoValidRows`] when every row was dropped.
pub fn normalize_rows(rows: &[RawRow]) -> Result<Vec<WordEntry>> {
  if rows.is_empty() {
    return Err(Error::EmptyBatch);
  }
  let cleaned: Vec<WordEntry> = rows.iter().filter_map(normalize_row).collect();
  if cleaned.is_empty() {
    return Err(Error::NoValidRows);
  }
  Ok(cleaned)
}

// ─── Upsert accounting ───────────────────────────────────────────────────────

/// Whether an upsert created a row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
  Inserted,
  Updated,
}

/// Totals for one bulk upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
  pub inserted: u64,
  pub updated:  u64,
  pub total:    u64,
}

impl BulkOutcome {
  pub fn record(&mut self, status: UpsertStatus) {
    match status {
      UpsertStatus::Inserted => self.inserted += 1,
      UpsertStatus::Updated => self.updated += 1,
    }
    self.total += 1;
  }
}

// ─── Dry run ─────────────────────────────────────────────────────────────────

/// An uploaded word that matches a stored word only when case is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearDuplicate {
  pub word:     String,
  pub existing: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunCounts {
  pub total:     u64,
  pub new:       u64,
  pub dup_exact: u64,
  pub dup_near:  u64,
}

/// Validation-only report for an upload; nothing is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunReport {
  pub counts:   DryRunCounts,
  pub dup_near: Vec<NearDuplicate>,
}

impl DryRunReport {
  /// Classify `entries` against the stored words that match any of them
  /// case-insensitively.
  pub fn classify(entries: &[WordEntry], stored: &[String]) -> Self {
    let mut report = Self::default();
    for entry in entries {
      report.counts.total += 1;
      if stored.iter().any(|s| *s == entry.word) {
        report.counts.dup_exact += 1;
      } else if let Some(existing) =
        stored.iter().find(|s| s.to_lowercase() == entry.word.to_lowercase())
      {
        report.counts.dup_near += 1;
        report.dup_near.push(NearDuplicate {
          word:     entry.word.clone(),
          existing: existing.clone(),
        });
      } else {
        report.counts.new += 1;
      }
    }
    report
  }
}
