//! Error type for `grocer-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] grocer_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value the domain types cannot represent.
  #[error("corrupt row: {0}")]
  CorruptRow(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
