use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::api::{MAX_LOGIN_FAILURE_WINDOW_MINUTES, MAX_TOKEN_TTL_SECONDS};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_LOGIN_MAX_FAILURES: &str = "login-max-failures";
pub const ARG_LOGIN_FAILURE_WINDOW_MINUTES: &str = "login-failure-window-minutes";
pub const ARG_SESSION_REAPER_INTERVAL_SECONDS: &str = "session-reaper-interval-seconds";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub throttle: ThrottleOptions,
    pub session_reaper_interval_seconds: u64,
    pub frontend_base_url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ThrottleOptions {
    pub max_failures: i64,
    pub window_minutes: i64,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the JWT secret is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .with_context(|| format!("missing required argument: --{ARG_JWT_SECRET}"))?;

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            token_ttl_seconds: matches
                .get_one::<i64>(ARG_TOKEN_TTL_SECONDS)
                .copied()
                .unwrap_or(604_800),
            throttle: ThrottleOptions {
                max_failures: matches
                    .get_one::<i64>(ARG_LOGIN_MAX_FAILURES)
                    .copied()
                    .unwrap_or(5),
                window_minutes: matches
                    .get_one::<i64>(ARG_LOGIN_FAILURE_WINDOW_MINUTES)
                    .copied()
                    .unwrap_or(15),
            },
            session_reaper_interval_seconds: matches
                .get_one::<u64>(ARG_SESSION_REAPER_INTERVAL_SECONDS)
                .copied()
                .unwrap_or(3600),
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    let command = with_throttle_args(command);
    command.arg(
        Arg::new(ARG_FRONTEND_BASE_URL)
            .long(ARG_FRONTEND_BASE_URL)
            .help("Frontend base URL allowed by CORS")
            .env("JOBPORTAL_FRONTEND_BASE_URL")
            .default_value("http://localhost:5173"),
    )
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign bearer tokens (HS256)")
                .env("JOBPORTAL_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Bearer token TTL in seconds")
                .env("JOBPORTAL_TOKEN_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_SECONDS)),
        )
        .arg(
            Arg::new(ARG_SESSION_REAPER_INTERVAL_SECONDS)
                .long(ARG_SESSION_REAPER_INTERVAL_SECONDS)
                .help("Interval between sweeps of sessions whose tokens have expired")
                .env("JOBPORTAL_SESSION_REAPER_INTERVAL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn with_throttle_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_LOGIN_MAX_FAILURES)
                .long(ARG_LOGIN_MAX_FAILURES)
                .help("Failed logins within the window before further attempts are refused")
                .env("JOBPORTAL_LOGIN_MAX_FAILURES")
                .default_value("5")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOGIN_FAILURE_WINDOW_MINUTES)
                .long(ARG_LOGIN_FAILURE_WINDOW_MINUTES)
                .help("Trailing window, in minutes, over which failed logins are counted")
                .env("JOBPORTAL_LOGIN_FAILURE_WINDOW_MINUTES")
                .default_value("15")
                .value_parser(
                    clap::value_parser!(i64).range(1..=MAX_LOGIN_FAILURE_WINDOW_MINUTES),
                ),
        )
}
