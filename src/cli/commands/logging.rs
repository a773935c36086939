use clap::{Arg, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>()
            && parsed <= 5
        {
            return Ok(parsed);
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("JOBPORTAL_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_accepts_names_and_numbers() {
        let parser = validator_log_level();
        let command = Command::new("t").arg(Arg::new("lvl").long("lvl").value_parser(parser));
        let matches = command
            .clone()
            .try_get_matches_from(["t", "--lvl", "DEBUG"])
            .ok();
        assert_eq!(
            matches.and_then(|m| m.get_one::<u8>("lvl").copied()),
            Some(3)
        );

        let matches = command.clone().try_get_matches_from(["t", "--lvl", "5"]).ok();
        assert_eq!(
            matches.and_then(|m| m.get_one::<u8>("lvl").copied()),
            Some(5)
        );

        assert!(command.try_get_matches_from(["t", "--lvl", "loud"]).is_err());
    }
}
