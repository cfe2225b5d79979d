//! The word catalog entry and its numeric range rules.
//!
//! A [`WordEntry`] is the strongly-typed form of one `word_bank` row. Raw
//! uploads are normalised into this type (see [`crate::ingest`]) before any
//! persistence call, so every entry that reaches a store already satisfies
//! the valence and energy ranges.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

// ─── Ranges and defaults ─────────────────────────────────────────────────────

/// Emotional tone of a word, from strongly negative to strongly positive.
pub const VALENCE_RANGE: RangeInclusive<i8> = -2..=2;

/// Arousal level of a word, from calm to energising.
pub const ENERGY_RANGE: RangeInclusive<u8> = 1..=5;

pub const DEFAULT_VALENCE: i8 = 1;
pub const DEFAULT_ENERGY: u8 = 3;
pub const DEFAULT_LANG: &str = "en";

/// Round half towards positive infinity, so `-0.5` becomes `0` and `2.5`
/// becomes `3`.
fn round_half_up(x: f64) -> f64 { (x + 0.5).floor() }

/// Round and clamp a raw valence into [`VALENCE_RANGE`].
///
/// Non-finite input yields [`DEFAULT_VALENCE`].
pub fn clamp_valence(raw: f64) -> i8 {
  if !raw.is_finite() {
    return DEFAULT_VALENCE;
  }
  let (lo, hi) = (*VALENCE_RANGE.start(), *VALENCE_RANGE.end());
  round_half_up(raw).clamp(f64::from(lo), f64::from(hi)) as i8
}

/// Round and clamp a raw energy into [`ENERGY_RANGE`].
///
/// Non-finite input yields [`DEFAULT_ENERGY`].
pub fn clamp_energy(raw: f64) -> u8 {
  if !raw.is_finite() {
    return DEFAULT_ENERGY;
  }
  let (lo, hi) = (*ENERGY_RANGE.start(), *ENERGY_RANGE.end());
  round_half_up(raw).clamp(f64::from(lo), f64::from(hi)) as u8
}

// ─── WordEntry ───────────────────────────────────────────────────────────────

/// One catalog word with its mood metadata.
///
/// `word` is the unique key. Upserting an entry whose `word` already exists
/// overwrites every other field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
  pub word:     String,
  pub lang:     String,
  pub valence:  i8,
  pub energy:   u8,
  pub types:    Vec<String>,
  pub domains:  Vec<String>,
  pub tags:     Vec<String>,
  pub synonyms: Vec<String>,
}

impl WordEntry {
  /// Entry with default language, valence and energy and empty lists.
  pub fn new(word: impl Into<String>) -> Self {
    Self {
      word:     word.into(),
      lang:     DEFAULT_LANG.to_owned(),
      valence:  DEFAULT_VALENCE,
      energy:   DEFAULT_ENERGY,
      types:    Vec::new(),
      domains:  Vec::new(),
      tags:     Vec::new(),
      synonyms: Vec::new(),
    }
  }

  pub fn with_levels(mut self, valence: i8, energy: u8) -> Self {
    self.valence = valence;
    self.energy = energy;
    self
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }
}
