//! Auth state and configuration.

use secrecy::SecretString;
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    rate_limit::LoginThrottle, storage::PgAuthStore, store::AuthStore, token::TokenIssuer,
};

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_LOGIN_MAX_FAILURES: i64 = 5;
const DEFAULT_LOGIN_FAILURE_WINDOW_MINUTES: i64 = 15;
const DEFAULT_SESSION_REAPER_INTERVAL_SECONDS: u64 = 60 * 60;

/// Upper bound for `--token-ttl-seconds` (ten years).
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;
/// Upper bound for `--login-failure-window-minutes` (one day).
pub const MAX_LOGIN_FAILURE_WINDOW_MINUTES: i64 = 24 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    token_ttl_seconds: i64,
    login_max_failures: i64,
    login_failure_window_minutes: i64,
    session_reaper_interval_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            login_max_failures: DEFAULT_LOGIN_MAX_FAILURES,
            login_failure_window_minutes: DEFAULT_LOGIN_FAILURE_WINDOW_MINUTES,
            session_reaper_interval_seconds: DEFAULT_SESSION_REAPER_INTERVAL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_login_max_failures(mut self, max_failures: i64) -> Self {
        self.login_max_failures = max_failures;
        self
    }

    #[must_use]
    pub fn with_login_failure_window_minutes(mut self, minutes: i64) -> Self {
        self.login_failure_window_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_session_reaper_interval_seconds(mut self, seconds: u64) -> Self {
        self.session_reaper_interval_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub const fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub const fn session_reaper_interval_seconds(&self) -> u64 {
        self.session_reaper_interval_seconds
    }

    #[must_use]
    pub fn throttle(&self) -> LoginThrottle {
        LoginThrottle::new(self.login_max_failures, self.login_failure_window_minutes)
    }
}

pub struct AuthState {
    config: AuthConfig,
    store: Arc<dyn AuthStore>,
    tokens: TokenIssuer,
    throttle: LoginThrottle,
}

impl AuthState {
    pub(crate) fn new(config: AuthConfig, store: Arc<dyn AuthStore>, secret: &SecretString) -> Self {
        let tokens = TokenIssuer::new(secret, config.token_ttl_seconds());
        let throttle = config.throttle();
        Self {
            config,
            store,
            tokens,
            throttle,
        }
    }

    /// Auth state backed by the Postgres tables in `sql/schema.sql`.
    #[must_use]
    pub fn with_postgres(config: AuthConfig, pool: PgPool, secret: &SecretString) -> Self {
        Self::new(config, Arc::new(PgAuthStore::new(pool)), secret)
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn AuthStore {
        self.store.as_ref()
    }

    pub(crate) const fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub(crate) const fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}
