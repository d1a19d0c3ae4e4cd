pub mod auth;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_LISTEN: &str = "listen";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("sessionist")
        .about("Cookie sessions with session-fixation mitigation")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8081")
                .env("SESSIONIST_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_LISTEN)
                .long(ARG_LISTEN)
                .help("Address to bind")
                .default_value("::")
                .env("SESSIONIST_LISTEN")
                .value_parser(clap::value_parser!(std::net::IpAddr)),
        );

    let command = auth::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}
