//! HR signup, login, and logout.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    kind::{AccountKind, Attributes, NewIdentity},
    state::AuthState,
    types::{HrAuthResponse, HrSignupRequest, HrUser, LoginRequest, MessageResponse},
    utils::client_info,
};
use crate::api::{
    error::ApiError,
    handlers::{json_body, required},
};

#[utoipa::path(
    post,
    path = "/signup",
    request_body = HrSignupRequest,
    responses(
        (status = 201, description = "HR account created and signed in.", body = HrAuthResponse),
        (status = 400, description = "Missing fields, weak password, or email already registered.", body = crate::api::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<HrSignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let (Some(full_name), Some(email), Some(password), Some(company)) = (
        required(request.full_name.as_deref()),
        required(request.email.as_deref()),
        request.password.as_deref().filter(|p| !p.is_empty()),
        required(request.company.as_deref()),
    ) else {
        return Err(ApiError::validation("All fields are required"));
    };

    let identity = NewIdentity {
        display_name: full_name.to_string(),
        email: email.to_string(),
        attributes: Attributes::Hr {
            company: company.to_string(),
        },
    };
    let issued = auth_state.signup(identity, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(HrAuthResponse {
            token: issued.token,
            user: HrUser::from(issued.identity),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in.", body = HrAuthResponse),
        (status = 400, description = "Email or password missing.", body = crate::api::ErrorBody),
        (status = 401, description = "Invalid email or password.", body = crate::api::ErrorBody),
        (status = 429, description = "Too many failed attempts.", body = crate::api::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let issued = auth_state
        .login(
            AccountKind::Hr,
            request.email.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
            &client_info(&headers),
        )
        .await?;

    Ok(Json(HrAuthResponse {
        token: issued.token,
        user: HrUser::from(issued.identity),
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
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
