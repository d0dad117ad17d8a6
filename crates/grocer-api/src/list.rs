//! Handlers for `/list` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/list` | [`ListView`]: entries grouped by store, plus pending count |
//! | `POST`   | `/list` | Body: [`NewListEntry`]; returns 201 + entry |
//! | `POST`   | `/list/from-price/:id` | Copy a catalog record onto the list |
//! | `POST`   | `/list/:id/toggle` | Flip `is_bought` |
//! | `DELETE` | `/list/:id` | 204 |
//!
//! The list is not PIN-gated.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use grocer_core::{
  list::{ListView, NewListEntry, ShoppingListEntry},
  store::{ListStore, RecordStore},
};
use uuid::Uuid;

use crate::{ApiState, Backend, error::ApiError, extract::JsonBody};

/// `GET /list`
pub async fn view<S: Backend>(
  State(state): State<ApiState<S>>,
) -> Result<Json<ListView>, ApiError> {
  let entries = state.store.list_entries().await.map_err(ApiError::store)?;
  Ok(Json(ListView::build(entries)))
}

async fn insert<S: Backend>(
  state: &ApiState<S>,
  input: NewListEntry,
) -> Result<(StatusCode, Json<ShoppingListEntry>), ApiError> {
  let input = input.validate()?;
  let entry = state.store.add_entry(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %entry.id, item = %entry.item_name, "list entry added");
  Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /list`
pub async fn add<S: Backend>(
  State(state): State<ApiState<S>>,
  JsonBody(body): JsonBody<NewListEntry>,
) -> Result<impl IntoResponse, ApiError> {
  insert(&state, body).await
}

/// `POST /list/from-price/:id`
pub async fn add_from_price<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let record = state
    .store
    .get_record(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("price {id} not found")))?;
  insert(&state, NewListEntry::from_record(&record)).await
}

/// `POST /list/:id/toggle`
pub async fn toggle<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ShoppingListEntry>, ApiError> {
  let entry = state
    .store
    .toggle_bought(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("list entry {id} not found")))?;
  Ok(Json(entry))
}

/// `DELETE /list/:id`
pub async fn remove<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let removed = state.store.remove_entry(id).await.map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("list entry {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
