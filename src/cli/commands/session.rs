use clap::{builder::BoolishValueParser, Arg, ArgAction, ArgMatches, Command};

use crate::session::DEFAULT_SWEEP_INTERVAL_SECS;

pub const ARG_SECURE_COOKIE: &str = "secure-cookie";
pub const ARG_SESSION_IDLE_SECONDS: &str = "session-idle-seconds";
pub const ARG_SWEEP_INTERVAL_SECONDS: &str = "sweep-interval-seconds";

#[derive(Debug)]
pub struct Options {
    pub secure_cookie: bool,
    pub idle_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            secure_cookie: matches.get_flag(ARG_SECURE_COOKIE),
            idle_seconds: matches
                .get_one::<u64>(ARG_SESSION_IDLE_SECONDS)
                .copied()
                .unwrap_or(0),
            sweep_interval_seconds: matches
                .get_one::<u64>(ARG_SWEEP_INTERVAL_SECONDS)
                .copied()
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SECURE_COOKIE)
                .long(ARG_SECURE_COOKIE)
                .help("Add Path=/; HttpOnly; SameSite=Lax; Secure to the session cookie")
                .env("SESSIONIST_SECURE_COOKIE")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_SESSION_IDLE_SECONDS)
                .long(ARG_SESSION_IDLE_SECONDS)
                .help("Drop sessions idle for this many seconds (0 keeps them forever)")
                .env("SESSIONIST_SESSION_IDLE_SECONDS")
                .default_value("0")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SWEEP_INTERVAL_SECONDS)
                .long(ARG_SWEEP_INTERVAL_SECONDS)
                .help("Interval between idle session sweeps in seconds")
                .env("SESSIONIST_SWEEP_INTERVAL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(u64)),
        )
}
