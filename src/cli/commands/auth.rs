use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";

#[derive(Debug)]
pub struct Options {
    pub username: String,
    pub password: SecretString,
}

impl Options {
    /// Parse the accepted account from matches.
    ///
    /// # Errors
    /// Returns an error if the username or password is empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            username: read_required(ARG_USERNAME)?,
            password: SecretString::from(read_required(ARG_PASSWORD)?),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_USERNAME)
                .long(ARG_USERNAME)
                .help("Username accepted by the login form")
                .env("SESSIONIST_USERNAME")
                .default_value("alice"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Password accepted by the login form")
                .env("SESSIONIST_PASSWORD")
                .hide_env_values(true)
                .hide_default_value(true)
                .default_value("bob"),
        )
}
