//! Postgres implementation of the auth store traits.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::{
    kind::{
        AccountKind, AttemptStatus, Attributes, Credential, Identity, LoginAttempt, NewIdentity,
        NewLoginAttempt, Session,
    },
    store::{CredentialStore, LoginLedger, SessionRegistry, StoreError},
    utils::{hash_session_token, is_foreign_key_violation, is_unique_violation},
};

#[derive(Clone, Debug)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map constraint violations raised while creating an account.
fn classify_signup_error(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateEmail
    } else if is_foreign_key_violation(&err) {
        StoreError::ForeignKeyViolation
    } else {
        StoreError::Database(err)
    }
}

pub(super) async fn insert_identity(
    tx: &mut Transaction<'_, Postgres>,
    identity: &NewIdentity,
) -> Result<Identity, StoreError> {
    let kind = identity.kind();
    let query = match kind {
        AccountKind::Hr => format!(
            "INSERT INTO {} (display_name, email, company) VALUES ($1, $2, $3) RETURNING id, created_at",
            kind.accounts_table()
        ),
        AccountKind::Candidate => format!(
            "INSERT INTO {} (display_name, email) VALUES ($1, $2) RETURNING id, created_at",
            kind.accounts_table()
        ),
    };
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );

    let mut statement = sqlx::query(&query)
        .bind(&identity.display_name)
        .bind(&identity.email);
    if let Some(company) = identity.attributes.company() {
        statement = statement.bind(company);
    }

    let row = statement
        .fetch_one(&mut **tx)
        .instrument(span)
        .await
        .map_err(classify_signup_error)?;

    Ok(Identity {
        id: row.get("id"),
        display_name: identity.display_name.clone(),
        email: identity.email.clone(),
        attributes: identity.attributes.clone(),
        created_at: row.get("created_at"),
    })
}

pub(super) async fn insert_credential(
    tx: &mut Transaction<'_, Postgres>,
    kind: AccountKind,
    id: Uuid,
    email: &str,
    password_hash: &str,
) -> Result<(), StoreError> {
    let query = format!(
        "INSERT INTO {} (id, email, password_hash) VALUES ($1, $2, $3)",
        kind.credentials_table()
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    sqlx::query(&query)
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .map_err(classify_signup_error)?;
    Ok(())
}

fn identity_from_row(kind: AccountKind, row: &PgRow) -> Identity {
    let attributes = match kind {
        AccountKind::Hr => Attributes::Hr {
            company: row.get("company"),
        },
        AccountKind::Candidate => Attributes::Candidate,
    };
    Identity {
        id: row.get("id"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        attributes,
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &PgRow) -> Session {
    Session {
        id: row.get("id"),
        credential_id: row.get("credential_id"),
        token_hash: row.get("token_hash"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl CredentialStore for PgAuthStore {
    async fn email_taken(&self, kind: AccountKind, email: &str) -> Result<bool, StoreError> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE email = $1) AS taken",
            kind.accounts_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;
        Ok(row.get("taken"))
    }

    async fn create_account(
        &self,
        identity: &NewIdentity,
        password_hash: &str,
    ) -> Result<Identity, StoreError> {
        // Identity and credential commit together or not at all.
        let mut tx = self.pool.begin().await?;

        let created = match insert_identity(&mut tx, identity).await {
            Ok(created) => created,
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err);
            }
        };

        if let Err(err) = insert_credential(
            &mut tx,
            identity.kind(),
            created.id,
            &created.email,
            password_hash,
        )
        .await
        {
            let _ = tx.rollback().await;
            return Err(err);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_credential_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let query = format!(
            "SELECT id, email, password_hash, created_at FROM {} WHERE email = $1",
            kind.credentials_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| Credential {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }

    async fn find_identity_by_id(
        &self,
        kind: AccountKind,
        id: Uuid,
    ) -> Result<Option<Identity>, StoreError> {
        let columns = match kind {
            AccountKind::Hr => "id, display_name, email, company, created_at",
            AccountKind::Candidate => "id, display_name, email, created_at",
        };
        let query = format!(
            "SELECT {columns} FROM {} WHERE id = $1",
            kind.accounts_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| identity_from_row(kind, &row)))
    }
}

#[async_trait]
impl SessionRegistry for PgAuthStore {
    async fn create_session(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
        token: &str,
    ) -> Result<Session, StoreError> {
        let token_hash = hash_session_token(token);
        let query = format!(
            "INSERT INTO {} (credential_id, token_hash) VALUES ($1, $2) RETURNING id, created_at",
            kind.sessions_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(credential_id)
            .bind(&token_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;

        Ok(Session {
            id: row.get("id"),
            credential_id,
            token_hash,
            created_at: row.get("created_at"),
        })
    }

    async fn find_by_token(
        &self,
        kind: AccountKind,
        token: &str,
    ) -> Result<Option<Session>, StoreError> {
        let query = format!(
            "SELECT id, credential_id, token_hash, created_at FROM {} WHERE token_hash = $1",
            kind.sessions_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let row = sqlx::query(&query)
            .bind(hash_session_token(token))
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;
        Ok(row.as_ref().map(session_from_row))
    }

    async fn delete_by_token(&self, kind: AccountKind, token: &str) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE token_hash = $1", kind.sessions_table());
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query.as_str()
        );
        let result = sqlx::query(&query)
            .bind(hash_session_token(token))
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<u64, StoreError> {
        let query = format!(
            "DELETE FROM {} WHERE credential_id = $1",
            kind.sessions_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query.as_str()
        );
        let result = sqlx::query(&query)
            .bind(credential_id)
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_for_credential(
        &self,
        kind: AccountKind,
        credential_id: Uuid,
    ) -> Result<Vec<Session>, StoreError> {
        let query = format!(
            "SELECT id, credential_id, token_hash, created_at FROM {} WHERE credential_id = $1 ORDER BY created_at DESC, id DESC",
            kind.sessions_table()
        );
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query.as_str()
        );
        let rows = sqlx::query(&query)
            .bind(credential_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;
        Ok(rows.iter().map(session_from_row).collect())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut purged = 0;
        for kind in AccountKind::ALL {
            let query = format!("DELETE FROM {} WHERE created_at < $1", kind.sessions_table());
            let span = tracing::info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "DELETE",
                db.statement = query.as_str()
            );
            let result = sqlx::query(&query)
                .bind(cutoff)
                .execute(&self.pool)
                .instrument(span)
                .await?;
            purged += result.rows_affected();
        }
        Ok(purged)
    }
}

#[async_trait]
impl LoginLedger for PgAuthStore {
    async fn record(&self, attempt: &NewLoginAttempt) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO login_history
                (email, user_type, ip_address, user_agent, status, failure_reason)
            VALUES ($1, $2, $3, $4, $5, $6)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(&attempt.email)
            .bind(attempt.kind.as_str())
            .bind(attempt.ip_address.as_deref())
            .bind(attempt.user_agent.as_deref())
            .bind(attempt.status.as_str())
            .bind(attempt.failure_reason.as_deref())
            .execute(&self.pool)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn count_recent_failures(
        &self,
        kind: AccountKind,
        email: &str,
        window: TimeDelta,
    ) -> Result<i64, StoreError> {
        let query = r"
            SELECT COUNT(*) AS failures
            FROM login_history
            WHERE email = $1
              AND user_type = $2
              AND status = 'failed'
              AND attempted_at > NOW() - ($3 * INTERVAL '1 second')
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(kind.as_str())
            .bind(window.num_seconds())
            .fetch_one(&self.pool)
            .instrument(span)
            .await?;
        Ok(row.get("failures"))
    }

    async fn history(
        &self,
        kind: AccountKind,
        email: &str,
        limit: i64,
    ) -> Result<Vec<LoginAttempt>, StoreError> {
        let query = r"
            SELECT email, ip_address, user_agent, status, failure_reason, attempted_at
            FROM login_history
            WHERE email = $1 AND user_type = $2
            ORDER BY attempted_at DESC, id DESC
            LIMIT $3
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(email)
            .bind(kind.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .instrument(span)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let status: String = row.get("status");
                LoginAttempt {
                    email: row.get("email"),
                    kind,
                    ip_address: row.get("ip_address"),
                    user_agent: row.get("user_agent"),
                    // The CHECK constraint only admits the two known values.
                    status: AttemptStatus::parse(&status).unwrap_or(AttemptStatus::Failed),
                    failure_reason: row.get("failure_reason"),
                    attempted_at: row.get("attempted_at"),
                }
            })
            .collect())
    }
}
