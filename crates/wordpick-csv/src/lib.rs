//! CSV codec for the word catalog.
//!
//! Reads header-keyed CSV into [`RawRow`] values ready for
//! [`wordpick_core::ingest::normalize_rows`], and writes catalog entries
//! back out in the same column layout. Pure synchronous; no HTTP or database
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use wordpick_csv::parse_rows;
//!
//! let csv = "word,valence,energy,tags\nCalm,1,1,soothe|ground\n";
//! let rows = parse_rows(csv).unwrap();
//! println!("{} rows", rows.len());
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
pub use serialize::{COLUMNS, TEMPLATE, to_csv};
use wordpick_core::ingest::RawRow;

/// Parse CSV text whose first record is the header row.
///
/// Blank lines are skipped. A record shorter than the header simply lacks
/// the trailing columns; extra cells beyond the header are ignored.
pub fn parse_rows(input: &str) -> Result<Vec<RawRow>> {
  let mut records = parse::split_records(input)?.into_iter();
  let header: Vec<String> = records
    .next()
    .ok_or(Error::MissingHeader)?
    .into_iter()
    .map(|name| name.trim().to_owned())
    .collect();

  Ok(
    records
      .map(|cells| {
        RawRow::from_cells(
          header
            .iter()
            .zip(cells)
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.clone(), cell)),
        )
      })
      .collect(),
  )
}
