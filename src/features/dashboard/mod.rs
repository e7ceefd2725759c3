//! Dashboard overview: the first few quizzes and announcements, fetched
//! together.

use crate::{
    api::{ApiError, Gateway},
    features::{
        announcements::{list_announcements, Announcement},
        quizzes::{list_quizzes, Quiz},
    },
};
use serde::Serialize;
use tracing::instrument;

/// Number of records of each kind shown on the dashboard.
pub const PREVIEW_LEN: usize = 3;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub quizzes: Vec<Quiz>,
    pub total_quizzes: usize,
    pub announcements: Vec<Announcement>,
    pub total_announcements: usize,
}

impl Overview {
    #[must_use]
    pub fn new(mut quizzes: Vec<Quiz>, mut announcements: Vec<Announcement>) -> Self {
        let total_quizzes = quizzes.len();
        let total_announcements = announcements.len();
        quizzes.truncate(PREVIEW_LEN);
        announcements.truncate(PREVIEW_LEN);

        Self {
            quizzes,
            total_quizzes,
            announcements,
            total_announcements,
        }
    }
}

/// Fetches quizzes and announcements concurrently. When the session has
/// expired both calls share one token refresh.
///
/// # Errors
/// Returns the first API or session error from either call.
#[instrument(skip_all)]
pub async fn overview(gateway: &Gateway) -> Result<Overview, ApiError> {
    let (quizzes, announcements) =
        tokio::try_join!(list_quizzes(gateway), list_announcements(gateway))?;

    Ok(Overview::new(quizzes, announcements))
}
