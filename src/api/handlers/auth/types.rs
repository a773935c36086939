//! Request/response payloads for auth and session endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::kind::{AccountKind, AttemptStatus, Identity, LoginAttempt, Session};
use crate::api::handlers::profile::types::CandidateProfile;

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HrSignupRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct CandidateSignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HrUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub company: String,
    pub role: AccountKind,
}

impl From<Identity> for HrUser {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            company: identity.attributes.company().unwrap_or_default().to_string(),
            email: identity.email,
            full_name: identity.display_name,
            role: AccountKind::Hr,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CandidateUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<CandidateProfile>,
}

impl CandidateUser {
    pub(crate) fn new(identity: Identity, profile: Option<CandidateProfile>) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            name: identity.display_name,
            role: AccountKind::Candidate,
            profile,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct HrAuthResponse {
    pub token: String,
    pub user: HrUser,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CandidateAuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub token: String,
    pub user: CandidateUser,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// True for the session that authenticated this request.
    pub current: bool,
}

impl SessionView {
    pub(crate) fn new(session: Session, current_session: Uuid) -> Self {
        Self {
            current: session.id == current_session,
            id: session.id,
            created_at: session.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttemptView {
    pub email: String,
    pub user_type: AccountKind,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AttemptStatus,
    pub failure_reason: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl From<LoginAttempt> for LoginAttemptView {
    fn from(attempt: LoginAttempt) -> Self {
        Self {
            email: attempt.email,
            user_type: attempt.kind,
            ip_address: attempt.ip_address,
            user_agent: attempt.user_agent,
            status: attempt.status,
            failure_reason: attempt.failure_reason,
            attempted_at: attempt.attempted_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(default)]
pub struct LogoutSessionRequest {
    pub token: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct LogoutAllResponse {
    pub message: String,
    pub revoked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::kind::Attributes;

    fn identity(attributes: Attributes) -> Identity {
        Identity {
            id: Uuid::nil(),
            display_name: "A".to_string(),
            email: "a@x.com".to_string(),
            attributes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn hr_user_serializes_camel_case() {
        let user = HrUser::from(identity(Attributes::Hr {
            company: "X".to_string(),
        }));
        let value = serde_json::to_value(&user).unwrap_or_default();
        assert_eq!(value["fullName"], "A");
        assert_eq!(value["company"], "X");
        assert_eq!(value["role"], "HR");
    }

    #[test]
    fn candidate_user_omits_missing_profile() {
        let user = CandidateUser::new(identity(Attributes::Candidate), None);
        let value = serde_json::to_value(&user).unwrap_or_default();
        assert_eq!(value["name"], "A");
        assert_eq!(value["role"], "candidate");
        assert!(value.get("profile").is_none());
    }

    #[test]
    fn signup_request_tolerates_missing_fields() {
        let request: HrSignupRequest =
            serde_json::from_str(r#"{"fullName":"A","email":"a@x.com"}"#).unwrap_or_default();
        assert_eq!(request.full_name.as_deref(), Some("A"));
        assert!(request.password.is_none());
    }
}
