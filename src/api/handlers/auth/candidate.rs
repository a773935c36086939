//! Candidate signup, login, and logout.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use super::{
    kind::{AccountKind, Attributes, NewIdentity},
    state::AuthState,
    types::{
        CandidateAuthResponse, CandidateSignupRequest, CandidateUser, LoginRequest,
        MessageResponse,
    },
    utils::client_info,
};
use crate::api::{
    error::ApiError,
    handlers::{json_body, profile::storage::find_profile, required},
};

#[utoipa::path(
    post,
    path = "/candidate/signup",
    request_body = CandidateSignupRequest,
    responses(
        (status = 201, description = "Candidate account created and signed in.", body = CandidateAuthResponse),
        (status = 400, description = "Missing fields, weak password, or email already registered.", body = crate::api::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<CandidateSignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let (Some(name), Some(email), Some(password)) = (
        required(request.name.as_deref()),
        required(request.email.as_deref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation("All fields are required"));
    };

    let identity = NewIdentity {
        display_name: name.to_string(),
        email: email.to_string(),
        attributes: Attributes::Candidate,
    };
    let issued = auth_state.signup(identity, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(CandidateAuthResponse {
            message: Some("Account created successfully".to_string()),
            token: issued.token,
            user: CandidateUser::new(issued.identity, None),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/candidate/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; the saved profile is attached when present.", body = CandidateAuthResponse),
        (status = 400, description = "Email or password missing.", body = crate::api::ErrorBody),
        (status = 401, description = "Invalid email or password.", body = crate::api::ErrorBody),
        (status = 429, description = "Too many failed attempts.", body = crate::api::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let issued = auth_state
        .login(
            AccountKind::Candidate,
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
            &client_info(&headers),
        )
        .await?;

    // The session is already issued; a profile lookup failure only drops the attachment.
    let profile = match find_profile(&pool, issued.identity.id).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!("Failed to load profile at login: {err}");
            None
        }
    };

    Ok(Json(CandidateAuthResponse {
        message: None,
        token: issued.token,
        user: CandidateUser::new(issued.identity, profile),
    }))
}

#[utoipa::path(
    post,
    path = "/candidate/logout",
    responses(
        (status = 200, description = "Session revoked (always succeeds).", body = MessageResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    auth_state.logout(&headers).await;
    Json(MessageResponse::new("Logged out successfully"))
}
