//! Session listing, login history, and revocation for the signed-in caller.

use axum::{
    Json,
    extract::{Extension, Query, rejection::JsonRejection},
    http::HeaderMap,
};
use std::sync::Arc;

use super::{
    auth::{
        AuthState,
        types::{
            HistoryQuery, LoginAttemptView, LogoutAllResponse, LogoutSessionRequest,
            MessageResponse, SessionView,
        },
    },
    json_body, required,
};
use crate::api::error::ApiError;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 200;

fn history_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map_or(DEFAULT_HISTORY_LIMIT, |limit| {
            limit.clamp(1, MAX_HISTORY_LIMIT)
        })
}

#[utoipa::path(
    get,
    path = "/sessions/my-sessions",
    responses(
        (status = 200, description = "Active sessions, newest first.", body = [SessionView]),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid or revoked token.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn my_sessions(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<SessionView>>, ApiError> {
    let principal = auth_state.authenticate(&headers).await?;
    let sessions = auth_state.sessions(&principal).await?;
    Ok(Json(
        sessions
            .into_iter()
            .map(|session| SessionView::new(session, principal.session_id))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/sessions/my-history",
    params(("limit" = Option<i64>, Query, description = "Entries to return (1-200, default 50)")),
    responses(
        (status = 200, description = "Login attempts for the caller's email, newest first.", body = [LoginAttemptView]),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid or revoked token.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn my_history(
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<Vec<LoginAttemptView>>, ApiError> {
    let principal = auth_state.authenticate(&headers).await?;
    let limit = history_limit(query.limit.as_deref());
    let history = auth_state.history(&principal, limit).await?;
    Ok(Json(history.into_iter().map(LoginAttemptView::from).collect()))
}

#[utoipa::path(
    post,
    path = "/sessions/logout-session",
    request_body = LogoutSessionRequest,
    responses(
        (status = 200, description = "Session revoked.", body = MessageResponse),
        (status = 400, description = "Token missing.", body = crate::api::ErrorBody),
        (status = 404, description = "No such session for the caller.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn logout_session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<LogoutSessionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = auth_state.authenticate(&headers).await?;
    let request = json_body(payload)?;
    let token =
        required(request.token.as_deref()).ok_or_else(|| ApiError::validation("Token is required"))?;

    auth_state.logout_session(&principal, token).await?;
    Ok(Json(MessageResponse::new(
        "Session deactivated successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/sessions/logout-all",
    responses(
        (status = 200, description = "Every session of the caller revoked.", body = LogoutAllResponse),
        (status = 401, description = "Missing token.", body = crate::api::ErrorBody),
        (status = 403, description = "Invalid or revoked token.", body = crate::api::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn logout_all(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Json<LogoutAllResponse>, ApiError> {
    let principal = auth_state.authenticate(&headers).await?;
    let revoked = auth_state.logout_all(&principal).await?;
    Ok(Json(LogoutAllResponse {
        message: "All sessions deactivated successfully".to_string(),
        revoked,
    }))
}

#[cfg(test)]
mod tests {
    use super::history_limit;

    #[test]
    fn history_limit_defaults_and_clamps() {
        assert_eq!(history_limit(None), 50);
        assert_eq!(history_limit(Some("abc")), 50);
        assert_eq!(history_limit(Some("10")), 10);
        assert_eq!(history_limit(Some("0")), 1);
        assert_eq!(history_limit(Some("-4")), 1);
        assert_eq!(history_limit(Some("5000")), 200);
    }
}
