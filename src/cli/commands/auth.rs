use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_SIGNUP: &str = "signup";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_TOKEN: &str = "token";

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email address")
        .required(true)
}

fn password(help: &'static str) -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help(help)
        .hide_env_values(true)
        .required(true)
}

fn confirm_password() -> Arg {
    Arg::new(ARG_CONFIRM_PASSWORD)
        .long("confirm-password")
        .help("Repeat the password")
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_LOGIN)
            .about("Sign in and store the session")
            .arg(email())
            .arg(password("Account password").env("QUIZDESK_PASSWORD")),
        Command::new(CMD_SIGNUP)
            .about("Create an account and store the session")
            .arg(
                Arg::new(ARG_NAME)
                    .short('n')
                    .long("name")
                    .help("Display name")
                    .required(true),
            )
            .arg(email())
            .arg(password("Account password"))
            .arg(confirm_password()),
        Command::new(CMD_LOGOUT).about("Forget the stored session"),
        Command::new(CMD_WHOAMI).about("Show the signed-in user"),
        Command::new(CMD_FORGOT_PASSWORD)
            .about("Email a password reset link")
            .arg(email()),
        Command::new(CMD_RESET_PASSWORD)
            .about("Set a new password with a reset token")
            .arg(
                Arg::new(ARG_TOKEN)
                    .short('t')
                    .long("token")
                    .help("Reset token from the reset link")
                    .required(true),
            )
            .arg(password("New password"))
            .arg(confirm_password()),
    ]
}
