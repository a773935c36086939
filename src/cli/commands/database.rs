use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_DB_MAX_CONNECTIONS: &str = "db-max-connections";
pub const ARG_APPLY_SCHEMA: &str = "apply-schema";

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub max_connections: u32,
    pub apply_schema: bool,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            max_connections: matches
                .get_one::<u32>(ARG_DB_MAX_CONNECTIONS)
                .copied()
                .unwrap_or(10),
            apply_schema: matches.get_flag(ARG_APPLY_SCHEMA),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_MAX_CONNECTIONS)
                .long(ARG_DB_MAX_CONNECTIONS)
                .help("Maximum number of pooled database connections")
                .env("JOBPORTAL_DB_MAX_CONNECTIONS")
                .default_value("10")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_APPLY_SCHEMA)
                .long(ARG_APPLY_SCHEMA)
                .help("Create missing tables and indexes at startup")
                .env("JOBPORTAL_APPLY_SCHEMA")
                .action(ArgAction::SetTrue),
        )
}
