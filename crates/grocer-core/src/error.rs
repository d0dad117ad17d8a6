//! Error types for `grocer-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed price, quantity, unit, or required text field. Raised before
  /// anything reaches storage.
  #[error("invalid input: {0}")]
  InvalidInput(String),
}

impl Error {
  pub(crate) fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidInput(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
