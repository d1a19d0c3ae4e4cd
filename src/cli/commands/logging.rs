use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accept either a verbosity count (`0`-`4`) or a level name.
fn parse_log_level(level: &str) -> Result<u8, String> {
    match level.parse::<u8>() {
        Ok(parsed) if parsed <= 4 => Ok(parsed),
        Ok(_) => Err("log level out of range (0-4)".to_string()),
        Err(_) => match level.to_ascii_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        },
    }
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_log_level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("SESSIONIST_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_counts() {
        assert_eq!(parse_log_level("error"), Ok(0));
        assert_eq!(parse_log_level("WARN"), Ok(1));
        assert_eq!(parse_log_level("Info"), Ok(2));
        assert_eq!(parse_log_level("debug"), Ok(3));
        assert_eq!(parse_log_level("trace"), Ok(4));
        assert_eq!(parse_log_level("3"), Ok(3));
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!(parse_log_level("verbose").is_err());
        assert!(parse_log_level("9").is_err());
        assert!(parse_log_level("").is_err());
    }
}
