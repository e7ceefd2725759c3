//! Request and response types for quiz API endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// A question is answerable when its correct answer is one of its options.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.options.iter().any(|option| option == &self.correct_answer)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /quizzes`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Body of `PATCH /quizzes/{id}`; unset fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct QuizPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

impl QuizPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.questions.is_none()
    }
}
