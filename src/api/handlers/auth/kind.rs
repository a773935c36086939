//! Account kinds and the records shared by both of them.
//!
//! HR and candidate accounts use identical credential, session, and ledger
//! logic; only the backing tables and the identity attributes differ.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AccountKind {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "candidate")]
    Candidate,
}

impl AccountKind {
    /// Order in which kind-agnostic lookups (logout, session revoke) probe the registry.
    pub const ALL: [Self; 2] = [Self::Hr, Self::Candidate];

    /// Role string carried in token claims and stored in `login_history.user_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hr => "HR",
            Self::Candidate => "candidate",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HR" => Some(Self::Hr),
            "candidate" => Some(Self::Candidate),
            _ => None,
        }
    }

    pub(crate) const fn accounts_table(self) -> &'static str {
        match self {
            Self::Hr => "hr_accounts",
            Self::Candidate => "candidate_accounts",
        }
    }

    pub(crate) const fn credentials_table(self) -> &'static str {
        match self {
            Self::Hr => "hr_credentials",
            Self::Candidate => "candidate_credentials",
        }
    }

    pub(crate) const fn sessions_table(self) -> &'static str {
        match self {
            Self::Hr => "hr_sessions",
            Self::Candidate => "candidate_sessions",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific identity attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attributes {
    Hr { company: String },
    Candidate,
}

impl Attributes {
    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        match self {
            Self::Hr { .. } => AccountKind::Hr,
            Self::Candidate => AccountKind::Candidate,
        }
    }

    #[must_use]
    pub fn company(&self) -> Option<&str> {
        match self {
            Self::Hr { company } => Some(company),
            Self::Candidate => None,
        }
    }
}

/// Signup payload after validation and email normalization.
#[derive(Clone, Debug)]
pub struct NewIdentity {
    pub display_name: String,
    pub email: String,
    pub attributes: Attributes,
}

impl NewIdentity {
    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        self.attributes.kind()
    }
}

#[derive(Clone, Debug)]
pub struct Identity {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
}

/// Login record; its id is the identity id.
#[derive(Clone, Debug)]
pub struct Credential {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registry entry for an issued token. Only the SHA-256 of the token is kept.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub token_hash: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Success,
    Failed,
}

impl AttemptStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Ledger row to append; the store stamps the time.
#[derive(Clone, Debug)]
pub struct NewLoginAttempt {
    pub email: String,
    pub kind: AccountKind,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AttemptStatus,
    pub failure_reason: Option<String>,
}

impl NewLoginAttempt {
    #[must_use]
    pub fn success(kind: AccountKind, email: &str, client: &ClientInfo) -> Self {
        Self {
            email: email.to_string(),
            kind,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            status: AttemptStatus::Success,
            failure_reason: None,
        }
    }

    #[must_use]
    pub fn failed(kind: AccountKind, email: &str, client: &ClientInfo, reason: &str) -> Self {
        Self {
            email: email.to_string(),
            kind,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
            status: AttemptStatus::Failed,
            failure_reason: Some(reason.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoginAttempt {
    pub email: String,
    pub kind: AccountKind,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AttemptStatus,
    pub failure_reason: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

/// Request metadata recorded alongside each login attempt.
#[derive(Clone, Debug, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_role_string() {
        for kind in AccountKind::ALL {
            assert_eq!(AccountKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(AccountKind::parse("hr"), None);
    }

    #[test]
    fn kind_serializes_as_role() {
        assert_eq!(
            serde_json::to_string(&AccountKind::Hr).ok().as_deref(),
            Some("\"HR\"")
        );
        assert_eq!(
            serde_json::to_string(&AccountKind::Candidate).ok().as_deref(),
            Some("\"candidate\"")
        );
    }

    #[test]
    fn tables_are_distinct_per_kind() {
        assert_ne!(
            AccountKind::Hr.sessions_table(),
            AccountKind::Candidate.sessions_table()
        );
        assert_eq!(AccountKind::Hr.credentials_table(), "hr_credentials");
        assert_eq!(
            AccountKind::Candidate.accounts_table(),
            "candidate_accounts"
        );
    }

    #[test]
    fn attributes_determine_kind() {
        let identity = NewIdentity {
            display_name: "A".to_string(),
            email: "a@x.com".to_string(),
            attributes: Attributes::Hr {
                company: "X".to_string(),
            },
        };
        assert_eq!(identity.kind(), AccountKind::Hr);
        assert_eq!(identity.attributes.company(), Some("X"));
        assert_eq!(Attributes::Candidate.kind(), AccountKind::Candidate);
        assert_eq!(Attributes::Candidate.company(), None);
    }
}
