// src/handlers.rs

pub mod guidebook;
pub mod work;

use axum::http::StatusCode;

use crate::common::error::AppError;

// Payload fields are optional so validation can report them; after `validate()` they are set
pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::field(field, "required"))
}

// GET /api/health
pub async fn health() -> StatusCode {
    StatusCode::OK
}
