//! Daily streak arithmetic.
//!
//! Day boundaries follow whatever time zone the caller supplies. The server
//! uses its own local zone, not the player's, so picks made near midnight
//! can land on a different day than the player expects.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Number of most recent picks examined when computing a streak.
pub const HISTORY_LIMIT: u32 = 50;

/// Distinct calendar days, in `tz`, on which a pick was made.
pub fn pick_days<Tz, I>(created: I, tz: &Tz) -> BTreeSet<NaiveDate>
where
  Tz: TimeZone,
  I: IntoIterator<Item = DateTime<Utc>>,
{
  created
    .into_iter()
    .map(|at| at.with_timezone(tz).date_naive())
    .collect()
}

/// Count consecutive days with a pick, walking backward from `today`.
///
/// A day without a pick today means the streak is already broken.
pub fn streak(today: NaiveDate, days: &BTreeSet<NaiveDate>) -> u32 {
  let mut count = 0;
  let mut cursor = Some(today);
  while let Some(day) = cursor.filter(|d| days.contains(d)) {
    count += 1;
    cursor = day.pred_opt();
  }
  count
}
