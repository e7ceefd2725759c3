//! Client wrappers for quiz API endpoints.

use crate::{
    api::{resource_path, ApiError, Gateway},
    features::quizzes::types::{Quiz, QuizDraft, QuizPatch},
};

const QUIZZES: &str = "/quizzes";

/// Fetches every quiz visible to the signed-in user.
///
/// # Errors
/// Returns the API or session error from the gateway.
pub async fn list_quizzes(gateway: &Gateway) -> Result<Vec<Quiz>, ApiError> {
    gateway.get_json(QUIZZES).await
}

/// Creates a quiz owned by the signed-in user.
///
/// # Errors
/// Returns the API or session error from the gateway.
pub async fn create_quiz(gateway: &Gateway, draft: &QuizDraft) -> Result<Quiz, ApiError> {
    gateway.post_json(QUIZZES, draft).await
}

/// Applies a partial update and returns the stored quiz.
///
/// # Errors
/// Returns `ApiError::Serialization` for an invalid id, otherwise the API or
/// session error from the gateway.
pub async fn update_quiz(gateway: &Gateway, id: &str, patch: &QuizPatch) -> Result<Quiz, ApiError> {
    let path = resource_path(QUIZZES, id)?;
    gateway.patch_json(&path, patch).await
}

/// # Errors
/// Returns `ApiError::Serialization` for an invalid id, otherwise the API or
/// session error from the gateway.
pub async fn delete_quiz(gateway: &Gateway, id: &str) -> Result<(), ApiError> {
    let path = resource_path(QUIZZES, id)?;
    gateway.delete(&path).await
}
