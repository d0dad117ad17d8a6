//! Shared-PIN write gate for catalog mutations.
//!
//! Every caller shares one PIN. It keeps casual visitors from editing prices;
//! it does not identify anyone. The server holds only an argon2 hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};

use crate::{ApiState, Backend, error::ApiError};

/// Request header carrying the write PIN.
pub const PIN_HEADER: &str = "x-grocer-pin";

/// The configured PIN, as an argon2 PHC string (`$argon2id$v=19$…`).
#[derive(Clone)]
pub struct WriteGate {
  pub pin_hash: String,
}

impl WriteGate {
  pub fn new(pin_hash: impl Into<String>) -> Self { Self { pin_hash: pin_hash.into() } }

  /// Check `pin` against the configured hash. A malformed hash rejects
  /// everything.
  pub fn verify(&self, pin: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(&self.pin_hash).map_err(|_| ApiError::Unauthorized)?;
    Argon2::default()
      .verify_password(pin.as_bytes(), &parsed)
      .map_err(|_| ApiError::Unauthorized)
  }

  /// Check the PIN carried in `headers`.
  pub fn verify_headers(&self, headers: &HeaderMap) -> Result<(), ApiError> {
    let pin = headers
      .get(PIN_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;
    self.verify(pin)
  }
}

/// Zero-size marker: present in the handler means the request carried the
/// right PIN.
pub struct WriteAccess;

impl<S: Backend> FromRequestParts<ApiState<S>> for WriteAccess {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let gate = state.gate.clone();
    let headers = parts.headers.clone();
    // argon2 verification blocks for tens of milliseconds.
    let verdict = tokio::task::spawn_blocking(move || gate.verify_headers(&headers))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;

    if verdict.is_err() {
      tracing::warn!(method = %parts.method, uri = %parts.uri, "rejected write: bad or missing PIN");
    }
    verdict.map(|()| WriteAccess)
  }
}
