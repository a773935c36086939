//! Job postings.
//!
//! Anyone can browse enabled jobs. HR accounts create postings and manage only
//! their own; a job owned by someone else answers 404 exactly like a missing one.

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
use uuid::Uuid;

use self::types::{
    CreateJobRequest, Job, JobUpdate, NewJob, SetEnabledRequest, SetEnabledResponse,
    UpdateJobRequest,
};
use super::{
    auth::{AccountKind, AuthState, access::require_ownership, principal::Principal, types::MessageResponse},
    json_body, optional, parse_id, required,
};
use crate::api::error::ApiError;

const NOT_OWNED: &str = "Job not found or access denied";

fn check_experience(from: Option<i32>, to: Option<i32>) -> Result<(), ApiError> {
    if from.is_some_and(|years| years < 0) || to.is_some_and(|years| years < 0) {
        return Err(ApiError::validation("Experience cannot be negative"));
    }
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(ApiError::validation(
            "experienceFrom cannot be greater than experienceTo",
        ));
    }
    Ok(())
}

/// Resolve the path id to a job the caller posted.
async fn owned_job_id(pool: &PgPool, principal: &Principal, raw_id: &str) -> Result<Uuid, ApiError> {
    let id = parse_id(raw_id).ok_or_else(|| ApiError::not_found(NOT_OWNED))?;
    let owner = storage::job_owner(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_OWNED))?;
    if require_ownership(owner, &principal.claims).is_allowed() {
        Ok(id)
    } else {
        Err(ApiError::not_found(NOT_OWNED))
    }
}

#[utoipa::path(
    get,
    path = "/jobs",
    responses(
        (status = 200, description = "Enabled jobs, newest first.", body = [Job]),
    ),
    tag = "jobs"
)]
pub async fn list_jobs(pool: Extension<PgPool>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(storage::list_enabled_jobs(&pool).await?))
}

#[utoipa::path(
    get,
    path = "/jobs/all",
    responses(
        (status = 200, description = "Every job posted by the caller, enabled or not.", body = [Job]),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid token or not an HR account.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn list_own_jobs(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let principal = auth_state.require_account(&headers, AccountKind::Hr).await?;
    Ok(Json(storage::list_jobs_posted_by(&pool, principal.id()).await?))
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "The job.", body = Job),
        (status = 404, description = "Job not found.", body = crate::api::ErrorBody),
    ),
    tag = "jobs"
)]
pub async fn get_job(
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> Result<Json<Job>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Job not found"))?;
    storage::find_job(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job not found"))
}

#[utoipa::path(
    post,
    path = "/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created and enabled.", body = Job),
        (status = 400, description = "Missing or invalid fields.", body = crate::api::ErrorBody),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid token or not an HR account.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn create_job(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = auth_state.require_account(&headers, AccountKind::Hr).await?;
    let request = json_body(payload)?;

    let (Some(title), Some(company), Some(location), Some(description)) = (
        required(request.title.as_deref()),
        required(request.company.as_deref()),
        required(request.location.as_deref()),
        required(request.description.as_deref()),
    ) else {
        return Err(ApiError::validation(
            "Title, company, location, and description are required",
        ));
    };
    check_experience(request.experience_from, request.experience_to)?;

    let new_job = NewJob {
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        salary: optional(request.salary),
        experience_from: request.experience_from,
        experience_to: request.experience_to,
        description: description.to_string(),
    };
    let job = storage::insert_job(&pool, &new_job, principal.id()).await?;
    info!(job_id = %job.id, posted_by = %principal.id(), "job created");

    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated job.", body = Job),
        (status = 400, description = "Invalid experience range.", body = crate::api::ErrorBody),
        (status = 404, description = "Job not found or not owned by the caller.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn update_job(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let principal = auth_state.require_account(&headers, AccountKind::Hr).await?;
    let id = owned_job_id(&pool, &principal, &id).await?;
    let request = json_body(payload)?;
    check_experience(request.experience_from, request.experience_to)?;

    let update = JobUpdate {
        title: optional(request.title),
        location: optional(request.location),
        salary: optional(request.salary),
        experience_from: request.experience_from,
        experience_to: request.experience_to,
        description: optional(request.description),
    };
    storage::update_job(&pool, id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_OWNED))
}

#[utoipa::path(
    patch,
    path = "/jobs/{id}/enabled",
    params(("id" = String, Path, description = "Job id")),
    request_body = SetEnabledRequest,
    responses(
        (status = 200, description = "Visibility updated.", body = SetEnabledResponse),
        (status = 404, description = "Job not found or not owned by the caller.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn set_job_enabled(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<SetEnabledRequest>, JsonRejection>,
) -> Result<Json<SetEnabledResponse>, ApiError> {
    let principal = auth_state.require_account(&headers, AccountKind::Hr).await?;
    let id = owned_job_id(&pool, &principal, &id).await?;
    let enabled = json_body(payload)?.enabled.unwrap_or(false);

    if !storage::set_job_enabled(&pool, id, enabled).await? {
        return Err(ApiError::not_found(NOT_OWNED));
    }
    info!(job_id = %id, enabled, "job visibility changed");

    Ok(Json(SetEnabledResponse {
        message: "Job status updated".to_string(),
        enabled,
    }))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted.", body = MessageResponse),
        (status = 404, description = "Job not found or not owned by the caller.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "jobs"
)]
pub async fn delete_job(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = auth_state.require_account(&headers, AccountKind::Hr).await?;
    let id = owned_job_id(&pool, &principal, &id).await?;

    if !storage::delete_job(&pool, id).await? {
        return Err(ApiError::not_found(NOT_OWNED));
    }
    info!(job_id = %id, "job deleted");

    Ok(Json(MessageResponse::new("Job deleted successfully")))
}
