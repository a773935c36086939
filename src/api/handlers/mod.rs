//! Route handlers and the helpers they share.
//!
//! Handlers parse the request, authorize through `auth::AuthState`, and hand
//! SQL to the `storage` module next to them. Every failure is an `ApiError`.

pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod profile;
pub mod root;
pub mod sessions;

use axum::{Json, extract::rejection::JsonRejection};
use uuid::Uuid;

use crate::api::error::ApiError;

/// Unwrap a JSON body, answering malformed input with `{ "error": ... }`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// Trimmed value of a required text field, `None` when missing or blank.
pub(crate) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Empty input becomes `None` so it is stored as NULL.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
