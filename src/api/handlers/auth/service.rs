//! Signup, login, and session flows shared by both account kinds.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, instrument, warn};

use super::{
    access::{AccessDecision, require_role, verify_still_exists},
    kind::{
        AccountKind, ClientInfo, Identity, LoginAttempt, NewIdentity, NewLoginAttempt, Session,
    },
    password::{self, MIN_PASSWORD_LEN},
    principal::Principal,
    rate_limit::{RateLimitDecision, THROTTLED_REASON},
    state::AuthState,
    store::{StoreError, delete_session_any_kind},
    utils::{extract_bearer_token, normalize_email, valid_email},
};
use crate::api::error::ApiError;
use axum::http::HeaderMap;

const USER_NOT_FOUND_REASON: &str = "User not found";
const INVALID_PASSWORD_REASON: &str = "Invalid password";

/// Token handed to the client together with the account it belongs to.
#[derive(Debug)]
pub(crate) struct Issued {
    pub token: String,
    pub identity: Identity,
}

impl AuthState {
    /// Create identity + credential, then issue and register a token.
    ///
    /// `identity.email` may be unnormalized; it is normalized here.
    #[instrument(skip_all, fields(kind = %identity.kind()))]
    pub(crate) async fn signup(
        &self,
        mut identity: NewIdentity,
        password: &str,
    ) -> Result<Issued, ApiError> {
        identity.email = normalize_email(&identity.email);
        identity.display_name = identity.display_name.trim().to_string();

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if !valid_email(&identity.email) {
            return Err(ApiError::validation("Invalid email format"));
        }

        let kind = identity.kind();
        if self.store().email_taken(kind, &identity.email).await? {
            return Err(ApiError::conflict("Email already registered"));
        }

        let password_hash = password::hash(password.to_string())
            .await
            .map_err(ApiError::internal)?;

        // A concurrent signup that slipped past the pre-check fails here as DuplicateEmail.
        let created = self
            .store()
            .create_account(&identity, &password_hash)
            .await?;

        let token = self.open_session(kind, &created).await?;
        info!(account_id = %created.id, "account created");

        Ok(Issued {
            token,
            identity: created,
        })
    }

    /// Throttle, verify, then issue and register a token.
    #[instrument(skip(self, password, client))]
    pub(crate) async fn login(
        &self,
        kind: AccountKind,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<Issued, ApiError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        let failures = self
            .store()
            .count_recent_failures(kind, &email, self.throttle().window())
            .await?;
        if self.throttle().decide(failures) == RateLimitDecision::Limited {
            self.record_attempt(NewLoginAttempt::failed(
                kind,
                &email,
                client,
                THROTTLED_REASON,
            ))
            .await;
            return Err(ApiError::RateLimited);
        }

        let Some(credential) = self.store().find_credential_by_email(kind, &email).await? else {
            self.record_attempt(NewLoginAttempt::failed(
                kind,
                &email,
                client,
                USER_NOT_FOUND_REASON,
            ))
            .await;
            return Err(ApiError::InvalidCredentials);
        };

        if !password::verify(password.to_string(), credential.password_hash.clone()).await {
            self.record_attempt(NewLoginAttempt::failed(
                kind,
                &email,
                client,
                INVALID_PASSWORD_REASON,
            ))
            .await;
            return Err(ApiError::InvalidCredentials);
        }

        let identity = self
            .store()
            .find_identity_by_id(kind, credential.id)
            .await?
            .ok_or_else(|| ApiError::internal(format!("credential {} has no identity", credential.id)))?;

        let token = self.open_session(kind, &identity).await?;
        self.record_attempt(NewLoginAttempt::success(kind, &email, client))
            .await;

        Ok(Issued { token, identity })
    }

    async fn open_session(&self, kind: AccountKind, identity: &Identity) -> Result<String, ApiError> {
        let (token, _claims) = self
            .tokens()
            .issue(identity.id, &identity.email, kind)
            .map_err(ApiError::internal)?;
        self.store()
            .create_session(kind, identity.id, &token)
            .await?;
        Ok(token)
    }

    /// Ledger writes are best effort and never fail the request.
    async fn record_attempt(&self, attempt: NewLoginAttempt) {
        if let Err(err) = self.store().record(&attempt).await {
            warn!(
                kind = %attempt.kind,
                status = attempt.status.as_str(),
                "Failed to record login attempt: {err}"
            );
        }
    }

    /// Revoke the presented token in whichever registry holds it.
    ///
    /// Missing tokens and storage failures are logged; logout always succeeds.
    pub(crate) async fn logout(&self, headers: &HeaderMap) {
        let Some(token) = extract_bearer_token(headers) else {
            return;
        };
        match delete_session_any_kind(self.store(), &token).await {
            Ok(true) => info!("session revoked"),
            Ok(false) => {}
            Err(err) => warn!("Failed to delete session: {err}"),
        }
    }

    /// Resolve the bearer token into a principal.
    ///
    /// The token must verify and still be present in its kind's registry.
    pub(crate) async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let token = extract_bearer_token(headers).ok_or(ApiError::MissingToken)?;
        let claims = self
            .tokens()
            .verify(&token)
            .map_err(|_| ApiError::InvalidToken)?;

        let session = self
            .store()
            .find_by_token(claims.role, &token)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        Ok(Principal {
            claims,
            session_id: session.id,
        })
    }

    /// Authenticate, then require `kind` and a live account behind the token.
    pub(crate) async fn require_account(
        &self,
        headers: &HeaderMap,
        kind: AccountKind,
    ) -> Result<Principal, ApiError> {
        let principal = self.authenticate(headers).await?;

        if require_role(&principal.claims, kind) != AccessDecision::Allow {
            return Err(ApiError::Forbidden(match kind {
                AccountKind::Hr => "HR access required".to_string(),
                AccountKind::Candidate => "Candidate access required".to_string(),
            }));
        }

        if verify_still_exists(self.store(), &principal.claims).await? != AccessDecision::Allow {
            return Err(ApiError::AccountGone(match kind {
                AccountKind::Hr => "Invalid HR user. Please log in again.".to_string(),
                AccountKind::Candidate => {
                    "Invalid candidate user. Please log in again.".to_string()
                }
            }));
        }

        Ok(principal)
    }

    pub(crate) async fn sessions(&self, principal: &Principal) -> Result<Vec<Session>, ApiError> {
        Ok(self
            .store()
            .list_for_credential(principal.kind(), principal.id())
            .await?)
    }

    pub(crate) async fn logout_all(&self, principal: &Principal) -> Result<u64, ApiError> {
        let revoked = self
            .store()
            .delete_all_for_credential(principal.kind(), principal.id())
            .await?;
        info!(revoked, "all sessions revoked");
        Ok(revoked)
    }

    /// Revoke one of the caller's own sessions by its token.
    pub(crate) async fn logout_session(
        &self,
        principal: &Principal,
        token: &str,
    ) -> Result<(), ApiError> {
        let kind = principal.kind();
        let owned = self
            .store()
            .find_by_token(kind, token)
            .await?
            .is_some_and(|session| session.credential_id == principal.id());
        if !owned {
            return Err(ApiError::not_found("Session not found"));
        }
        self.store().delete_by_token(kind, token).await?;
        Ok(())
    }

    pub(crate) async fn history(
        &self,
        principal: &Principal,
        limit: i64,
    ) -> Result<Vec<LoginAttempt>, ApiError> {
        Ok(self
            .store()
            .history(principal.kind(), &principal.claims.email, limit)
            .await?)
    }

    /// Delete registry rows whose tokens can no longer verify.
    ///
    /// A lifetime reaching past the representable range purges nothing.
    ///
    /// # Errors
    /// Returns a storage error if the purge fails.
    pub(crate) async fn purge_expired_sessions(&self) -> Result<u64, StoreError> {
        let cutoff = TimeDelta::try_seconds(self.tokens().ttl_seconds())
            .and_then(|lifetime| Utc::now().checked_sub_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.store().purge_created_before(cutoff).await
    }
}
