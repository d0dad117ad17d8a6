//! Handlers for `/prices` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/prices` | `?q=`; ranked cheapest first, first hit flagged `best_value` |
//! | `GET`    | `/prices/compare` | `?q=&limit=`; ranked, truncated (default 5) |
//! | `GET`    | `/prices/:id` | Single record |
//! | `POST`   | `/prices` | PIN-gated. Body: [`NewPriceRecord`]; returns 201 + record |
//! | `PUT`    | `/prices/:id` | PIN-gated. Body: [`NewPriceRecord`] |
//! | `DELETE` | `/prices/:id` | PIN-gated. 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use grocer_core::{
  price::{NewPriceRecord, PriceRecord},
  rank::{self, COMPARE_LIMIT, RankedRecord},
  store::RecordStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, Backend, error::ApiError, extract::JsonBody, gate::WriteAccess};

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Substring of the item name.
  #[serde(default)]
  pub q:     String,
  /// Compare view only: maximum rows.
  pub limit: Option<usize>,
}

async fn fetch_matches<S: Backend>(
  state: &ApiState<S>,
  query: &str,
) -> Result<Vec<PriceRecord>, ApiError> {
  // Skip the round-trip when the ranker would discard everything anyway.
  if !rank::is_searchable(query) {
    return Ok(Vec::new());
  }
  state
    .store
    .query_by_item_substring(query)
    .await
    .map_err(ApiError::store)
}

/// `GET /prices?q=<text>`
pub async fn search<S: Backend>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RankedRecord>>, ApiError> {
  let records = fetch_matches(&state, &params.q).await?;
  Ok(Json(rank::rank(records, &params.q)))
}

/// `GET /prices/compare?q=<text>[&limit=<n>]`
pub async fn compare<S: Backend>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RankedRecord>>, ApiError> {
  let records = fetch_matches(&state, &params.q).await?;
  let limit = params.limit.unwrap_or(COMPARE_LIMIT);
  Ok(Json(rank::compare(records, &params.q, limit)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /prices/:id`
pub async fn get_one<S: Backend>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PriceRecord>, ApiError> {
  let record = state
    .store
    .get_record(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("price {id} not found")))?;
  Ok(Json(record))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /prices`: returns 201 + the stored [`PriceRecord`].
pub async fn create<S: Backend>(
  State(state): State<ApiState<S>>,
  _access: WriteAccess,
  JsonBody(body): JsonBody<NewPriceRecord>,
) -> Result<impl IntoResponse, ApiError> {
  // Reject malformed amounts as 400 before the store sees them.
  body.normalize()?;

  let record = state
    .store
    .insert_record(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %record.id, item = %record.item_name, store = %record.store_name, "price recorded");
  Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /prices/:id`: replaces all editable fields; rates are re-derived.
pub async fn update_one<S: Backend>(
  State(state): State<ApiState<S>>,
  _access: WriteAccess,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<NewPriceRecord>,
) -> Result<Json<PriceRecord>, ApiError> {
  body.normalize()?;

  let record = state
    .store
    .update_record(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("price {id} not found")))?;
  tracing::info!(%id, "price updated");
  Ok(Json(record))
}

/// `DELETE /prices/:id`
pub async fn delete_one<S: Backend>(
  State(state): State<ApiState<S>>,
  _access: WriteAccess,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let deleted = state
    .store
    .delete_record(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("price {id} not found")));
  }
  tracing::info!(%id, "price deleted");
  Ok(StatusCode::NO_CONTENT)
}
