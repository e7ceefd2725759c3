use crate::{
    api::Gateway,
    cli::{
        actions::{auth, content, Action, TerminalNavigator},
        globals::GlobalArgs,
    },
    store::{self, FileStore},
};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::debug;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the gateway cannot be built, a content action runs
/// without a stored session, or the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    debug!(
        api_url = %globals.api_url,
        credentials = %globals.credentials_path.display(),
        "building gateway"
    );

    let gateway = Gateway::new(
        &globals.gateway_config(),
        Arc::new(FileStore::new(globals.credentials_path.clone())),
        Arc::new(TerminalNavigator),
    )?;

    match action {
        Action::Auth(action) => auth::execute(action, &gateway).await,
        Action::Dashboard => {
            require_session(&gateway)?;
            content::execute_dashboard(&gateway).await
        }
        Action::Quizzes(action) => {
            require_session(&gateway)?;
            content::execute_quiz(action, &gateway).await
        }
        Action::Announcements(action) => {
            require_session(&gateway)?;
            content::execute_announcement(action, &gateway).await
        }
    }
}

/// Content commands need a signed-in user; fail before any call is made.
fn require_session(gateway: &Gateway) -> Result<()> {
    if !store::is_authenticated(gateway.store())? {
        bail!("not signed in; run `quizdesk login` first");
    }
    Ok(())
}
