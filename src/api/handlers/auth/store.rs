//! Storage seams for the auth core.
//!
//! Every operation takes the [`AccountKind`] so one implementation serves both
//! account hierarchies. Emails are expected to be normalized by the caller.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::kind::{AccountKind, Credential, Identity, LoginAttempt, NewIdentity, NewLoginAttempt, Session};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint on the email column rejected the insert.
    #[error("email already registered")]
    DuplicateEmail,
    /// Credential insert referenced a missing identity.
    #[error("credential references a missing identity")]
    ForeignKeyViolation,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fast-path existence check. The unique constraint remains the real guard.
    async fn email_taken(&self, kind: AccountKind, email: &str) -> Result<bool, StoreError>;

    /// Create identity and credential atomically.
    async fn create_account(
        &self,
        identity: &NewIdentity,
        password_hash: &str,
    ) -> Result<Identity, StoreError>;

    async fn find_credential_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Credential>, StoreError>;

    async fn find_identity_by_id(
        &self,
        kind: AccountKind,
        id: Uuid,
    ) -> Result<Option<Identity>, StoreError>;
}

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    async fn create_session(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
        token: &str,
    ) -> Result<Session, StoreError>;

    async fn find_by_token(
        &self,
        kind: AccountKind,
        token: &str,
    ) -> Result<Option<Session>, StoreError>;

    /// Idempotent; reports whether a row was removed.
    async fn delete_by_token(&self, kind: AccountKind, token: &str) -> Result<bool, StoreError>;

    async fn delete_all_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<u64, StoreError>;

    /// Newest first.
    async fn list_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<Vec<Session>, StoreError>;

    /// Drop sessions of every kind created before `cutoff`.
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait LoginLedger: Send + Sync {
    async fn record(&self, attempt: &NewLoginAttempt) -> Result<(), StoreError>;

    /// Failed attempts for `(kind, email)` inside the trailing `window`.
    async fn count_recent_failures(
        &self,
        kind: AccountKind,
        email: &str,
        window: TimeDelta,
    ) -> Result<i64, StoreError>;

    /// Most recent first.
    async fn history(
        &self,
        kind: AccountKind,
        email: &str,
        limit: i64,
    ) -> Result<Vec<LoginAttempt>, StoreError>;
}

/// Everything the auth flows need from persistence.
pub trait AuthStore: CredentialStore + SessionRegistry + LoginLedger {}

impl<T> AuthStore for T where T: CredentialStore + SessionRegistry + LoginLedger {}

/// Revoke a token in whichever registry holds it.
///
/// # Errors
/// Returns the first storage error encountered.
pub async fn delete_session_any_kind(
    store: &dyn AuthStore,
    token: &str,
) -> Result<bool, StoreError> {
    for kind in AccountKind::ALL {
        if store.delete_by_token(kind, token).await? {
            return Ok(true);
        }
    }
    Ok(false)
}
