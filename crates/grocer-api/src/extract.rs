//! Request extractors whose rejections use the [`ApiError`] JSON shape.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// [`axum::Json`], rejecting malformed or mistyped bodies (an unknown
/// `weight_unit`, a string where a number belongs) as 400
/// `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
