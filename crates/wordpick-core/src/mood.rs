//! Mood states and the word filters they map to.

use serde::{Deserialize, Serialize};

use crate::word::WordEntry;

pub const DEFAULT_SUGGESTIONS: u32 = 12;
pub const MAX_SUGGESTIONS: u32 = 24;

// ─── MoodState ───────────────────────────────────────────────────────────────

/// How the player says they feel. Each state selects a [`MoodFilter`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MoodState {
  #[default]
  Sad,
  Anxious,
  Tired,
  Stuck,
  HappyMore,
  Focus,
}

impl MoodState {
  pub const ALL: [MoodState; 6] = [
    Self::Sad,
    Self::Anxious,
    Self::Tired,
    Self::Stuck,
    Self::HappyMore,
    Self::Focus,
  ];

  /// The wire key, matching the `snake_case` serde names.
  pub fn key(self) -> &'static str {
    match self {
      Self::Sad => "sad",
      Self::Anxious => "anxious",
      Self::Tired => "tired",
      Self::Stuck => "stuck",
      Self::HappyMore => "happy_more",
      Self::Focus => "focus",
    }
  }

  /// Case-insensitive lookup by key.
  pub fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    Self::ALL
      .into_iter()
      .find(|state| state.key().eq_ignore_ascii_case(raw))
  }

  /// Resolve a query value; missing or unknown input falls back to
  /// [`MoodState::Sad`].
  pub fn resolve(raw: Option<&str>) -> Self {
    raw.and_then(Self::parse).unwrap_or_default()
  }

  pub fn filter(self) -> MoodFilter {
    match self {
      Self::Sad => MoodFilter::new(1, 1, 2, &["soothe", "ground", "care"]),
      Self::Anxious => MoodFilter::new(1, 1, 2, &["soothe", "focus", "simplify"]),
      Self::Tired => MoodFilter::new(1, 1, 2, &["recover", "soothe"]),
      Self::Stuck => MoodFilter::new(1, 2, 3, &["start", "progress", "activate"]),
      Self::HappyMore => {
        MoodFilter::new(2, 3, 5, &["elevate", "celebrate", "joy"])
      }
      Self::Focus => MoodFilter::new(1, 2, 3, &["focus", "simplify"]),
    }
  }
}

// ─── MoodFilter ──────────────────────────────────────────────────────────────

/// Predicate over catalog words.
///
/// A word matches when `valence >= valence_min`, `energy` lies in
/// `energy_min..=energy_max`, and its tags share at least one element with
/// `tags_any` (an empty `tags_any` matches every word).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodFilter {
  pub valence_min: i8,
  pub energy_min:  u8,
  pub energy_max:  u8,
  pub tags_any:    &'static [&'static str],
}

impl MoodFilter {
  pub const fn new(
    valence_min: i8,
    energy_min: u8,
    energy_max: u8,
    tags_any: &'static [&'static str],
  ) -> Self {
    Self { valence_min, energy_min, energy_max, tags_any }
  }

  pub fn matches(&self, entry: &WordEntry) -> bool {
    entry.valence >= self.valence_min
      && (self.energy_min..=self.energy_max).contains(&entry.energy)
      && (self.tags_any.is_empty()
        || entry.tags.iter().any(|t| self.tags_any.contains(&t.as_str())))
  }
}

/// Parse the requested suggestion count from its leading integer (`"3.5"` and
/// `"3x"` both read as 3), defaulting to [`DEFAULT_SUGGESTIONS`] and clamping
/// into `1..=MAX_SUGGESTIONS`.
pub fn suggestion_count(raw: Option<&str>) -> u32 {
  let n = raw
    .and_then(leading_integer)
    .unwrap_or(i64::from(DEFAULT_SUGGESTIONS));
  n.clamp(1, i64::from(MAX_SUGGESTIONS)) as u32
}

/// Optional sign then ASCII digits at the start of `s`. Saturates on overflow.
fn leading_integer(s: &str) -> Option<i64> {
  let s = s.trim_start();
  let (negative, rest) = match s.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, s.strip_prefix('+').unwrap_or(s)),
  };
  let end = rest
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(rest.len());
  if end == 0 {
    return None;
  }
  let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
  Some(if negative { -magnitude } else { magnitude })
}
