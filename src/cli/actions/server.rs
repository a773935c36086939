use crate::api::{self, AuthConfig, DatabaseConfig, Environment};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub environment: Environment,
    pub db_max_connections: u32,
    pub apply_schema: bool,
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub login_max_failures: i64,
    pub login_failure_window_minutes: i64,
    pub session_reaper_interval_seconds: u64,
    pub frontend_base_url: String,
}

impl Args {
    fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(self.frontend_base_url.clone())
            .with_token_ttl_seconds(self.token_ttl_seconds)
            .with_login_max_failures(self.login_max_failures)
            .with_login_failure_window_minutes(self.login_failure_window_minutes)
            .with_session_reaper_interval_seconds(self.session_reaper_interval_seconds)
    }

    const fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            max_connections: self.db_max_connections,
            apply_schema: self.apply_schema,
        }
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = args.auth_config();
    let database = args.database();

    debug!(
        port = args.port,
        environment = ?args.environment,
        max_connections = database.max_connections,
        apply_schema = database.apply_schema,
        "starting server"
    );

    api::new(
        args.port,
        args.dsn,
        database,
        auth_config,
        args.jwt_secret,
        args.environment,
    )
    .await
}
