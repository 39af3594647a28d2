//! Error type for `meet-store-sqlite`.

use meet_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] meet_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(#[from] chrono::ParseError),

  /// A row holds a value the domain types cannot represent.
  #[error("corrupt row: {0}")]
  Decode(String),
}

impl StoreError for Error {
  fn domain(&self) -> Option<&meet_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
