//! In-memory auth store for exercising the flows without a database.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use super::{
    kind::{
        AccountKind, AttemptStatus, Credential, Identity, LoginAttempt, NewIdentity,
        NewLoginAttempt, Session,
    },
    store::{CredentialStore, LoginLedger, SessionRegistry, StoreError},
    utils::hash_session_token,
};

#[derive(Default)]
struct Tables {
    identities: Vec<(AccountKind, Identity)>,
    credentials: Vec<(AccountKind, Credential)>,
    sessions: Vec<(AccountKind, Session)>,
    ledger: Vec<LoginAttempt>,
}

#[derive(Default)]
pub(crate) struct MemoryAuthStore {
    tables: Mutex<Tables>,
}

impl MemoryAuthStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Append a ledger row with an explicit timestamp.
    pub(crate) fn record_at(&self, attempt: &NewLoginAttempt, attempted_at: DateTime<Utc>) {
        self.lock().ledger.push(LoginAttempt {
            email: attempt.email.clone(),
            kind: attempt.kind,
            ip_address: attempt.ip_address.clone(),
            user_agent: attempt.user_agent.clone(),
            status: attempt.status,
            failure_reason: attempt.failure_reason.clone(),
            attempted_at,
        });
    }

    /// Delete an identity, cascading to its credential and sessions as the schema does.
    pub(crate) fn remove_identity(&self, kind: AccountKind, id: Uuid) {
        let mut tables = self.lock();
        tables
            .identities
            .retain(|(k, identity)| !(*k == kind && identity.id == id));
        tables
            .credentials
            .retain(|(k, credential)| !(*k == kind && credential.id == id));
        tables
            .sessions
            .retain(|(k, session)| !(*k == kind && session.credential_id == id));
    }

    pub(crate) fn ledger_len(&self) -> usize {
        self.lock().ledger.len()
    }

    pub(crate) fn identity_count(&self, kind: AccountKind) -> usize {
        self.lock()
            .identities
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

#[async_trait]
impl CredentialStore for MemoryAuthStore {
    async fn email_taken(&self, kind: AccountKind, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .identities
            .iter()
            .any(|(k, identity)| *k == kind && identity.email == email))
    }

    async fn create_account(
        &self,
        identity: &NewIdentity,
        password_hash: &str,
    ) -> Result<Identity, StoreError> {
        let kind = identity.kind();
        let mut tables = self.lock();
        if tables
            .identities
            .iter()
            .any(|(k, existing)| *k == kind && existing.email == identity.email)
        {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let created = Identity {
            id: Uuid::new_v4(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            attributes: identity.attributes.clone(),
            created_at: now,
        };
        tables.identities.push((kind, created.clone()));
        tables.credentials.push((
            kind,
            Credential {
                id: created.id,
                email: created.email.clone(),
                password_hash: password_hash.to_string(),
                created_at: now,
            },
        ));
        Ok(created)
    }

    async fn find_credential_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .lock()
            .credentials
            .iter()
            .find(|(k, credential)| *k == kind && credential.email == email)
            .map(|(_, credential)| credential.clone()))
    }

    async fn find_identity_by_id(
        &self,
        kind: AccountKind,
        id: Uuid,
    ) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .lock()
            .identities
            .iter()
            .find(|(k, identity)| *k == kind && identity.id == id)
            .map(|(_, identity)| identity.clone()))
    }
}

#[async_trait]
impl SessionRegistry for MemoryAuthStore {
    async fn create_session(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
        token: &str,
    ) -> Result<Session, StoreError> {
        let mut tables = self.lock();
        if !tables
            .credentials
            .iter()
            .any(|(k, credential)| *k == kind && credential.id == credential_id)
        {
            return Err(StoreError::ForeignKeyViolation);
        }
        let session = Session {
            id: Uuid::new_v4(),
            credential_id,
            token_hash: hash_session_token(token),
            created_at: Utc::now(),
        };
        tables.sessions.push((kind, session.clone()));
        Ok(session)
    }

    async fn find_by_token(
        &self,
        kind: AccountKind,
        token: &str,
    ) -> Result<Option<Session>, StoreError> {
        let token_hash = hash_session_token(token);
        Ok(self
            .lock()
            .sessions
            .iter()
            .find(|(k, session)| *k == kind && session.token_hash == token_hash)
            .map(|(_, session)| session.clone()))
    }

    async fn delete_by_token(&self, kind: AccountKind, token: &str) -> Result<bool, StoreError> {
        let token_hash = hash_session_token(token);
        let mut tables = self.lock();
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|(k, session)| !(*k == kind && session.token_hash == token_hash));
        Ok(tables.sessions.len() < before)
    }

    async fn delete_all_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|(k, session)| !(*k == kind && session.credential_id == credential_id));
        Ok(u64::try_from(before - tables.sessions.len()).unwrap_or(u64::MAX))
    }

    async fn list_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<Vec<Session>, StoreError> {
        // Sessions are appended in creation order.
        Ok(self
            .lock()
            .sessions
            .iter()
            .rev()
            .filter(|(k, session)| *k == kind && session.credential_id == credential_id)
            .map(|(_, session)| session.clone())
            .collect())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|(_, session)| session.created_at >= cutoff);
        Ok(u64::try_from(before - tables.sessions.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl LoginLedger for MemoryAuthStore {
    async fn record(&self, attempt: &NewLoginAttempt) -> Result<(), StoreError> {
        self.record_at(attempt, Utc::now());
        Ok(())
    }

    async fn count_recent_failures(
        &self,
        kind: AccountKind,
        email: &str,
        window: TimeDelta,
    ) -> Result<i64, StoreError> {
        let since = Utc::now()
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let count = self
            .lock()
            .ledger
            .iter()
            .filter(|attempt| {
                attempt.kind == kind
                    && attempt.email == email
                    && attempt.status == AttemptStatus::Failed
                    && attempt.attempted_at > since
            })
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn history(
        &self,
        kind: AccountKind,
        email: &str,
        limit: i64,
    ) -> Result<Vec<LoginAttempt>, StoreError> {
        let mut attempts: Vec<LoginAttempt> = self
            .lock()
            .ledger
            .iter()
            .filter(|attempt| attempt.kind == kind && attempt.email == email)
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal timestamps; reverse for newest first.
        attempts.sort_by_key(|attempt| attempt.attempted_at);
        attempts.reverse();
        attempts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(attempts)
    }
}
