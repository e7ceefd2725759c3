//! Quiz listing and editing.

pub mod client;
pub mod types;

pub use self::client::{create_quiz, delete_quiz, list_quizzes, update_quiz};
pub use self::types::{Question, Quiz, QuizDraft, QuizPatch};
