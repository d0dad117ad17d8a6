//! HTTP server wiring for Grocer.
//!
//! Mounts the JSON API from [`grocer_api`] under `/api`, adds request
//! tracing, and owns the configuration shape read by the binary.

use std::path::{Path, PathBuf};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Router, routing::get};
use grocer_api::{ApiState, Backend};
use rand_core::OsRng;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GROCER_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// argon2 PHC string for the shared write PIN. Generate with
  /// `grocer-server --hash-pin`.
  #[serde(default)]
  pub write_pin_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("grocer.db") }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S: Backend>(state: ApiState<S>) -> Router {
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", grocer_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Hash a PIN into the PHC string expected by `write_pin_hash`.
pub fn hash_pin(pin: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(pin.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
    .to_string();
  Ok(hash)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use grocer_api::{PIN_HEADER, WriteGate};
  use grocer_core::rank::RankedRecord;
  use grocer_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state(pin: &str) -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ApiState::new(store, WriteGate::new(hash_pin(pin).unwrap()))
  }

  #[test]
  fn config_defaults_fill_gaps() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("port", 9000)
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("grocer.db"));
    assert!(cfg.write_pin_hash.is_empty());
    assert_eq!(cfg.address(), "127.0.0.1:9000");
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/grocer.db")),
      PathBuf::from(home).join("grocer.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
  }

  #[tokio::test]
  async fn health_is_ok() {
    let app = router(make_state("1234").await);
    let resp = app
      .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_is_nested_and_gated() {
    let state = make_state("1234").await;
    let body = r#"{"store_name":"Costco","item_name":"Rice","brand":null,
                   "price":10,"weight_value":2,"weight_unit":"kg"}"#;

    let post = |pin: &'static str| {
      Request::builder()
        .method("POST")
        .uri("/api/prices")
        .header(header::CONTENT_TYPE, "application/json")
        .header(PIN_HEADER, pin)
        .body(Body::from(body))
        .unwrap()
    };

    let resp = router(state.clone()).oneshot(post("9999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = router(state.clone()).oneshot(post("1234")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router(state)
      .oneshot(Request::builder().uri("/api/prices?q=ri").body(Body::empty()).unwrap())
      .await
      .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let hits: Vec<RankedRecord> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.rates.per_kilogram(), Some(5.0));
  }
}
