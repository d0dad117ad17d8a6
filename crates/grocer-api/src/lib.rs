//! JSON REST API for Grocer.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`RecordStore`] and [`ListStore`]. TLS and transport concerns are the
//! caller's responsibility; the write gate for catalog mutations lives here.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", grocer_api::api_router(state))
//! ```

pub mod error;
pub mod extract;
pub mod gate;
pub mod list;
pub mod prices;
pub mod suggestions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use grocer_core::store::{ListStore, RecordStore};

pub use error::ApiError;
pub use gate::{PIN_HEADER, WriteGate};

/// Everything a handler needs from the storage layer.
pub trait Backend: RecordStore + ListStore + Clone + Send + Sync + 'static {}

impl<T> Backend for T where T: RecordStore + ListStore + Clone + Send + Sync + 'static {}

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S: Backend> {
  pub store: Arc<S>,
  pub gate:  Arc<WriteGate>,
}

impl<S: Backend> ApiState<S> {
  pub fn new(store: S, gate: WriteGate) -> Self {
    Self { store: Arc::new(store), gate: Arc::new(gate) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(state: ApiState<S>) -> Router<()> {
  Router::new()
    // Price catalog
    .route("/prices", get(prices::search::<S>).post(prices::create::<S>))
    .route("/prices/compare", get(prices::compare::<S>))
    .route(
      "/prices/{id}",
      get(prices::get_one::<S>)
        .put(prices::update_one::<S>)
        .delete(prices::delete_one::<S>),
    )
    .route("/suggestions", get(suggestions::handler::<S>))
    // Shopping list
    .route("/list", get(list::view::<S>).post(list::add::<S>))
    .route("/list/from-price/{id}", post(list::add_from_price::<S>))
    .route("/list/{id}/toggle", post(list::toggle::<S>))
    .route("/list/{id}", delete(list::remove::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
