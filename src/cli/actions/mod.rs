pub mod auth;
pub mod content;

// Internal "interpreter" for `Action`.
mod run;

use crate::{cli::globals::GlobalArgs, navigation::Navigator};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Auth(auth::AuthAction),
    Dashboard,
    Quizzes(content::QuizAction),
    Announcements(content::AnnouncementAction),
}

impl Action {
    /// Execute the action against the API described by `globals`.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        run::execute(self, globals).await
    }
}

/// Navigator for a terminal session: there is no view to leave, so the user is
/// told how to start over.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "session ended");
        eprintln!("Your session has ended. Sign in again with `quizdesk login`.");
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
