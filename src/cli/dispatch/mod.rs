//! Map validated CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, session, ARG_LISTEN, ARG_PORT};
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv6Addr};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8081);
    let listen = matches
        .get_one::<IpAddr>(ARG_LISTEN)
        .copied()
        .unwrap_or(IpAddr::V6(Ipv6Addr::UNSPECIFIED));

    let auth_opts = auth::Options::parse(matches).context("invalid login account")?;
    let session_opts = session::Options::parse(matches);

    Ok(Action::Server(Args {
        listen,
        port,
        username: auth_opts.username,
        password: auth_opts.password,
        secure_cookie: session_opts.secure_cookie,
        session_idle_seconds: session_opts.idle_seconds,
        sweep_interval_seconds: session_opts.sweep_interval_seconds,
    }))
}
