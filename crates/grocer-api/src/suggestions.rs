//! Handler for `GET /suggestions`: autocomplete values for the entry form.

use axum::{Json, extract::State};
use grocer_core::{
  store::RecordStore,
  suggest::{SUGGESTION_SAMPLE, Suggestions},
};

use crate::{ApiState, Backend, error::ApiError};

/// `GET /suggestions`
pub async fn handler<S: Backend>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Suggestions>, ApiError> {
  let records = state
    .store
    .list_records(SUGGESTION_SAMPLE)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Suggestions::collect(&records)))
}
