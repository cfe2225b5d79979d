//! RFC 4180 record splitter.
//!
//! Pipeline:
//!   raw &str
//!     └─ strip BOM, trim surrounding whitespace
//!          └─ split_records()  → Vec<Vec<String>>
//!               └─ drop records whose cells are all blank
//!
//! Tolerates bare LF and lone CR line endings and stray quotes in the middle
//! of unquoted fields.

use crate::error::{Error, Result};

/// Split CSV text into records of cells.
pub(crate) fn split_records(input: &str) -> Result<Vec<Vec<String>>> {
  let input = input.strip_prefix('\u{feff}').unwrap_or(input).trim();

  let mut records: Vec<Vec<String>> = Vec::new();
  let mut record: Vec<String> = Vec::new();
  let mut cell = String::new();
  let mut in_quotes = false;
  // True from the first character of a cell until anything is appended.
  let mut at_cell_start = true;
  let mut line = 1usize;
  let mut quote_line = 0usize;

  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          cell.push('"');
        }
        '"' => in_quotes = false,
        '\n' => {
          line += 1;
          cell.push(c);
        }
        _ => cell.push(c),
      }
      continue;
    }

    match c {
      '"' if at_cell_start => {
        in_quotes = true;
        at_cell_start = false;
        quote_line = line;
      }
      ',' => {
        record.push(std::mem::take(&mut cell));
        at_cell_start = true;
      }
      '\r' | '\n' => {
        if c == '\r' && chars.peek() == Some(&'\n') {
          chars.next();
        }
        line += 1;
        record.push(std::mem::take(&mut cell));
        push_record(&mut records, std::mem::take(&mut record));
        at_cell_start = true;
      }
      _ => {
        cell.push(c);
        at_cell_start = false;
      }
    }
  }

  if in_quotes {
    return Err(Error::UnterminatedQuote { line: quote_line });
  }
  if !at_cell_start || !cell.is_empty() || !record.is_empty() {
    record.push(cell);
    push_record(&mut records, record);
  }

  Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
  if record.iter().any(|cell| !cell.trim().is_empty()) {
    records.push(record);
  }
}
