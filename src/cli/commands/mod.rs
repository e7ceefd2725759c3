pub mod auth;
pub mod content;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_CREDENTIALS: &str = "credentials";
pub const ARG_TIMEOUT: &str = "timeout";

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

    let command = Command::new("quizdesk")
        .about("Quiz and announcement dashboard client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the dashboard API")
                .default_value(crate::DEFAULT_API_BASE_URL)
                .env("QUIZDESK_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS)
                .long("credentials")
                .help("Credential file (default: $XDG_CONFIG_HOME/quizdesk/credentials.json)")
                .env("QUIZDESK_CREDENTIALS")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds")
                .default_value("10")
                .env("QUIZDESK_TIMEOUT")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommands(auth::subcommands())
        .subcommand(content::dashboard())
        .subcommand(content::quizzes())
        .subcommand(content::announcements());

    logging::with_args(command)
}
