//! Error types for the wordpick-csv codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV input has no header row")]
  MissingHeader,

  #[error("unterminated quoted field starting on line {line}")]
  UnterminatedQuote { line: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
