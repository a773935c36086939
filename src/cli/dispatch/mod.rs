//! Map validated CLI arguments to the action to run.

use crate::api::Environment;
use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_ENVIRONMENT, auth, database};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let environment = matches
        .get_one::<String>(ARG_ENVIRONMENT)
        .map_or(Some(Environment::default()), |value| {
            Environment::parse(value)
        })
        .context("invalid value for --environment")?;

    let database_opts = database::Options::parse(matches);
    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        environment,
        db_max_connections: database_opts.max_connections,
        apply_schema: database_opts.apply_schema,
        jwt_secret: auth_opts.jwt_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        login_max_failures: auth_opts.throttle.max_failures,
        login_failure_window_minutes: auth_opts.throttle.window_minutes,
        session_reaper_interval_seconds: auth_opts.session_reaper_interval_seconds,
        frontend_base_url: auth_opts.frontend_base_url,
    }))
}
