//! Maps validated command-line matches to an [`Action`] and the connection
//! settings it runs with.

use crate::{
    cli::{
        actions::{
            auth::AuthAction,
            content::{AnnouncementAction, QuizAction},
            Action,
        },
        commands::{
            auth as auth_args, content as content_args, ARG_API_URL, ARG_CREDENTIALS, ARG_TIMEOUT,
        },
        globals::GlobalArgs,
    },
    features::{
        announcements::{AnnouncementDraft, AnnouncementPatch},
        auth::{valid_email, valid_password, MIN_PASSWORD_LENGTH},
    },
};
use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn email(matches: &ArgMatches) -> Result<String> {
    let email = required(matches, auth_args::ARG_EMAIL)?.trim().to_string();
    if !valid_email(&email) {
        bail!("invalid email address: {email}");
    }
    Ok(email)
}

/// Reads `--password` and `--confirm-password`, which must match.
fn new_password(matches: &ArgMatches) -> Result<SecretString> {
    let password = required(matches, auth_args::ARG_PASSWORD)?;
    let confirm = required(matches, auth_args::ARG_CONFIRM_PASSWORD)?;

    if password != confirm {
        bail!("passwords do not match");
    }
    if !valid_password(&password) {
        bail!("password must be at least {MIN_PASSWORD_LENGTH} characters");
    }

    Ok(SecretString::from(password))
}

/// # Errors
/// Returns an error if the API URL is missing.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = required(matches, ARG_API_URL)?;

    let mut globals = GlobalArgs::new(api_url);

    if let Some(path) = matches.get_one::<PathBuf>(ARG_CREDENTIALS) {
        globals.credentials_path.clone_from(path);
    }

    if let Some(seconds) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.timeout = Duration::from_secs(*seconds);
    }

    Ok(globals)
}

/// # Errors
/// Returns an error if the subcommand is unknown or its arguments are invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    let action = match name {
        auth_args::CMD_LOGIN => Action::Auth(AuthAction::Login {
            email: email(sub_m)?,
            password: SecretString::from(required(sub_m, auth_args::ARG_PASSWORD)?),
        }),
        auth_args::CMD_SIGNUP => {
            let name = required(sub_m, auth_args::ARG_NAME)?.trim().to_string();
            if name.is_empty() {
                bail!("name must not be empty");
            }
            Action::Auth(AuthAction::Signup {
                name,
                email: email(sub_m)?,
                password: new_password(sub_m)?,
            })
        }
        auth_args::CMD_LOGOUT => Action::Auth(AuthAction::Logout),
        auth_args::CMD_WHOAMI => Action::Auth(AuthAction::WhoAmI),
        auth_args::CMD_FORGOT_PASSWORD => Action::Auth(AuthAction::ForgotPassword {
            email: email(sub_m)?,
        }),
        auth_args::CMD_RESET_PASSWORD => Action::Auth(AuthAction::ResetPassword {
            token: SecretString::from(required(sub_m, auth_args::ARG_TOKEN)?),
            password: new_password(sub_m)?,
        }),
        content_args::CMD_DASHBOARD => Action::Dashboard,
        content_args::CMD_QUIZZES => Action::Quizzes(quiz_action(sub_m)?),
        content_args::CMD_ANNOUNCEMENTS => Action::Announcements(announcement_action(sub_m)?),
        other => bail!("unknown subcommand: {other}"),
    };

    Ok(action)
}

fn quiz_action(matches: &ArgMatches) -> Result<QuizAction> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing quizzes subcommand"))?;
    let questions = || sub_m.get_one::<PathBuf>(content_args::ARG_QUESTIONS).cloned();

    Ok(match name {
        content_args::CMD_LIST => QuizAction::List,
        content_args::CMD_CREATE => QuizAction::Create {
            title: required(sub_m, content_args::ARG_TITLE)?,
            description: required(sub_m, content_args::ARG_DESCRIPTION)?,
            questions: questions(),
        },
        content_args::CMD_UPDATE => QuizAction::Update {
            id: required(sub_m, content_args::ARG_ID)?,
            title: optional(sub_m, content_args::ARG_TITLE),
            description: optional(sub_m, content_args::ARG_DESCRIPTION),
            questions: questions(),
        },
        content_args::CMD_DELETE => QuizAction::Delete {
            id: required(sub_m, content_args::ARG_ID)?,
        },
        other => bail!("unknown quizzes subcommand: {other}"),
    })
}

fn announcement_action(matches: &ArgMatches) -> Result<AnnouncementAction> {
    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing announcements subcommand"))?;

    Ok(match name {
        content_args::CMD_LIST => AnnouncementAction::List,
        content_args::CMD_CREATE => AnnouncementAction::Create(AnnouncementDraft {
            title: required(sub_m, content_args::ARG_TITLE)?,
            content: required(sub_m, content_args::ARG_CONTENT)?,
        }),
        content_args::CMD_UPDATE => AnnouncementAction::Update {
            id: required(sub_m, content_args::ARG_ID)?,
            patch: AnnouncementPatch {
                title: optional(sub_m, content_args::ARG_TITLE),
                content: optional(sub_m, content_args::ARG_CONTENT),
            },
        },
        content_args::CMD_DELETE => AnnouncementAction::Delete {
            id: required(sub_m, content_args::ARG_ID)?,
        },
        other => bail!("unknown announcements subcommand: {other}"),
    })
}
