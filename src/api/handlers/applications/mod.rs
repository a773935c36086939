//! Candidate applications and saved jobs.

pub(crate) mod storage;
pub mod types;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use self::types::{Application, ApplyRequest, SaveToggleResponse, SavedJob};
use super::{
    auth::{AccountKind, AuthState, types::MessageResponse, utils::is_unique_violation},
    jobs::storage::find_job,
    json_body, parse_id, profile::storage::is_completed, required,
};
use crate::api::error::ApiError;

const ALREADY_APPLIED: &str = "Already applied to this job";

#[utoipa::path(
    post,
    path = "/applications",
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted.", body = MessageResponse),
        (status = 400, description = "Missing job id, duplicate application, or incomplete profile.", body = crate::api::ErrorBody),
        (status = 404, description = "Job missing or disabled.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn apply(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;
    let request = json_body(payload)?;

    let raw_job_id =
        required(request.job_id.as_deref()).ok_or_else(|| ApiError::validation("Job ID is required"))?;
    let unavailable = || ApiError::not_found("Job not found or not available");
    let job_id = parse_id(raw_job_id).ok_or_else(unavailable)?;
    let job = find_job(&pool, job_id)
        .await?
        .filter(|job| job.enabled)
        .ok_or_else(unavailable)?;

    let candidate_id = principal.id();
    if storage::application_exists(&pool, candidate_id, job.id).await? {
        return Err(ApiError::conflict(ALREADY_APPLIED));
    }
    if !is_completed(&pool, candidate_id).await? {
        return Err(ApiError::validation(
            "Please complete your profile before applying",
        ));
    }

    let application_id = match storage::insert_application(&pool, candidate_id, job.id).await {
        Ok(id) => id,
        Err(err) if is_unique_violation(&err) => return Err(ApiError::conflict(ALREADY_APPLIED)),
        Err(err) => return Err(err.into()),
    };
    info!(%application_id, job_id = %job.id, %candidate_id, "application submitted");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Application submitted successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/applications",
    responses(
        (status = 200, description = "The caller's applications with their jobs, newest first.", body = [Application]),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn list_applications(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<Application>>, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;
    Ok(Json(
        storage::list_applications(&pool, principal.id()).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/applications/save/{job_id}",
    params(("job_id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Saved state toggled.", body = SaveToggleResponse),
        (status = 400, description = "Invalid job id.", body = crate::api::ErrorBody),
        (status = 404, description = "Job not found.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn toggle_saved(
    Path(job_id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<SaveToggleResponse>, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;
    let job_id = parse_id(&job_id).ok_or_else(|| ApiError::validation("Invalid job ID"))?;
    if find_job(&pool, job_id).await?.is_none() {
        return Err(ApiError::not_found("Job not found"));
    }

    let saved = storage::toggle_saved_job(&pool, principal.id(), job_id).await?;
    Ok(Json(SaveToggleResponse::new(saved)))
}

#[utoipa::path(
    get,
    path = "/applications/saved",
    responses(
        (status = 200, description = "Saved jobs, most recently saved first.", body = [SavedJob]),
    ),
    security(("bearer" = [])),
    tag = "applications"
)]
pub async fn list_saved(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<SavedJob>>, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;
    Ok(Json(storage::list_saved_jobs(&pool, principal.id()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_messages() {
        let saved = SaveToggleResponse::new(true);
        assert_eq!(saved.message, "Job saved");
        assert!(saved.saved);

        let removed = SaveToggleResponse::new(false);
        assert_eq!(removed.message, "Job removed from saved");
        assert!(!removed.saved);
    }

    #[test]
    fn apply_request_reads_job_id() {
        let request: ApplyRequest = serde_json::from_str(r#"{"jobId":"abc"}"#).unwrap_or_default();
        assert_eq!(request.job_id.as_deref(), Some("abc"));
    }
}
