//! Error types for `wordpick-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("rows[] required")]
  EmptyBatch,

  #[error("no valid rows")]
  NoValidRows,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
