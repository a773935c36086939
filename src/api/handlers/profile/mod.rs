//! Candidate profile read and upsert, plus the stored resume.
//!
//! The profile gates applications: a candidate can only apply once the
//! profile is saved with `completed = true`. The resume travels base64-encoded
//! inside the profile JSON and is downloaded as a PDF.

pub(crate) mod storage;
pub mod types;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use self::types::{CandidateProfile, ProfileRecord, SaveProfileRequest};
use super::{
    auth::{AccountKind, AuthState, types::MessageResponse},
    json_body, optional,
};
use crate::api::error::ApiError;

#[utoipa::path(
    get,
    path = "/candidate/profile",
    responses(
        (status = 200, description = "Saved profile, or an empty one when none exists.", body = CandidateProfile),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid token or not a candidate.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn get_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<CandidateProfile>, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;

    let profile = storage::find_profile(&pool, principal.id())
        .await?
        .unwrap_or_else(|| CandidateProfile::empty(&principal.claims.email));

    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/candidate/profile",
    request_body = SaveProfileRequest,
    responses(
        (status = 200, description = "Profile saved.", body = MessageResponse),
        (status = 400, description = "Malformed body or resume encoding.", body = crate::api::ErrorBody),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid token or not a candidate.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn save_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<SaveProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;
    let request = json_body(payload)?;

    let record = profile_record(request, &principal.claims.email)?;
    storage::upsert_profile(&pool, principal.id(), &record).await?;
    info!(
        candidate_id = %principal.id(),
        completed = record.completed,
        resume_bytes = record.resume.as_ref().map_or(0, Vec::len),
        "profile saved"
    );

    Ok(Json(MessageResponse::new("Profile saved successfully")))
}

#[utoipa::path(
    get,
    path = "/candidate/resume",
    responses(
        (status = 200, description = "Stored resume.", content_type = "application/pdf"),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid token or not a candidate.", body = crate::api::ErrorBody),
        (status = 404, description = "No resume uploaded.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "profile"
)]
pub async fn get_resume(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = auth_state
        .require_account(&headers, AccountKind::Candidate)
        .await?;

    let (resume, file_name) = storage::find_resume(&pool, principal.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Resume not found"))?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    response_headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(file_name.as_deref()),
    );

    Ok((StatusCode::OK, response_headers, resume))
}

/// `attachment` header naming the uploaded file, `resume.pdf` when unnamed.
fn content_disposition(file_name: Option<&str>) -> HeaderValue {
    let file_name = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains('"'))
        .unwrap_or("resume.pdf");
    HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"resume.pdf\""))
}

/// Decode the base64 resume field; blank or empty content means "no upload".
fn decode_resume(encoded: Option<String>) -> Result<Option<Vec<u8>>, ApiError> {
    let Some(encoded) = optional(encoded) else {
        return Ok(None);
    };
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| ApiError::validation("Invalid resume encoding"))?;
    Ok(Some(bytes).filter(|bytes| !bytes.is_empty()))
}

/// Email falls back to the one in the token when omitted.
fn profile_record(
    request: SaveProfileRequest,
    token_email: &str,
) -> Result<ProfileRecord, ApiError> {
    Ok(ProfileRecord {
        email: optional(request.email).unwrap_or_else(|| token_email.to_string()),
        experience_level: optional(request.experience_level),
        serving_notice: optional(request.serving_notice),
        full_name: optional(request.full_name),
        phone: optional(request.phone),
        notice_period: optional(request.notice_period),
        last_working_day: optional(request.last_working_day),
        linkedin_url: optional(request.linkedin_url),
        portfolio_url: optional(request.portfolio_url),
        current_location: optional(request.current_location),
        preferred_location: optional(request.preferred_location),
        resume_file_name: optional(request.resume_file_name),
        resume: decode_resume(request.resume)?,
        education: request.education.unwrap_or_default(),
        certifications: request.certifications.unwrap_or_default(),
        experiences: request.experiences.unwrap_or_default(),
        completed: request.completed.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_profile_carries_token_email() {
        let profile = CandidateProfile::empty("c@x.com");
        let value = serde_json::to_value(&profile).unwrap_or_default();
        assert_eq!(value["email"], "c@x.com");
        assert_eq!(value["fullName"], "");
        assert_eq!(value["education"], json!([]));
        assert_eq!(value["completed"], false);
    }

    #[test]
    fn record_defaults_email_and_nulls_blanks() {
        let request = SaveProfileRequest {
            full_name: Some(String::new()),
            phone: Some("555".to_string()),
            completed: Some(true),
            ..SaveProfileRequest::default()
        };
        let Ok(record) = profile_record(request, "c@x.com") else {
            panic!("record rejected");
        };
        assert_eq!(record.email, "c@x.com");
        assert_eq!(record.full_name, None);
        assert_eq!(record.phone.as_deref(), Some("555"));
        assert!(record.completed);
        assert!(record.education.is_empty());
        assert_eq!(record.resume, None);
    }

    #[test]
    fn resume_is_decoded_from_base64() {
        let request = SaveProfileRequest {
            resume: Some(STANDARD.encode(b"%PDF-1.4 body")),
            ..SaveProfileRequest::default()
        };
        let Ok(record) = profile_record(request, "c@x.com") else {
            panic!("record rejected");
        };
        assert_eq!(record.resume.as_deref(), Some(&b"%PDF-1.4 body"[..]));
    }

    #[test]
    fn wrapped_base64_is_accepted() {
        let encoded = STANDARD.encode(b"%PDF-1.7 wrapped");
        let (head, tail) = encoded.split_at(8);
        let decoded = decode_resume(Some(format!("{head}\n{tail}\n")));
        assert!(matches!(decoded, Ok(Some(bytes)) if bytes == b"%PDF-1.7 wrapped"));
    }

    #[test]
    fn blank_resume_keeps_stored_file() {
        assert!(matches!(decode_resume(None), Ok(None)));
        assert!(matches!(decode_resume(Some("  ".to_string())), Ok(None)));
    }

    #[test]
    fn malformed_resume_is_rejected() {
        let request = SaveProfileRequest {
            resume: Some("not base64!".to_string()),
            ..SaveProfileRequest::default()
        };
        let result = profile_record(request, "c@x.com");
        assert!(matches!(result, Err(ApiError::Validation(message)) if message == "Invalid resume encoding"));
    }

    #[test]
    fn download_names_the_uploaded_file() {
        assert_eq!(
            content_disposition(Some("cv.pdf")),
            "attachment; filename=\"cv.pdf\""
        );
        assert_eq!(
            content_disposition(None),
            "attachment; filename=\"resume.pdf\""
        );
        assert_eq!(
            content_disposition(Some("bad\"name.pdf")),
            "attachment; filename=\"resume.pdf\""
        );
    }

    #[test]
    fn request_accepts_camel_case_lists() {
        let request: SaveProfileRequest = serde_json::from_value(json!({
            "fullName": "C",
            "education": [{"degree": "BSc"}],
            "completed": true
        }))
        .unwrap_or_default();
        assert_eq!(request.full_name.as_deref(), Some("C"));
        assert_eq!(request.education.map(|e| e.len()), Some(1));
        assert_eq!(request.completed, Some(true));
    }
}
