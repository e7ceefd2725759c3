use crate::{
    api::Gateway,
    cli::actions::print_json,
    features::{
        announcements::{self, AnnouncementDraft, AnnouncementPatch},
        dashboard,
        quizzes::{self, Question, QuizDraft, QuizPatch},
    },
};
use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug)]
pub enum QuizAction {
    List,
    Create {
        title: String,
        description: String,
        questions: Option<PathBuf>,
    },
    Update {
        id: String,
        title: Option<String>,
        description: Option<String>,
        questions: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug)]
pub enum AnnouncementAction {
    List,
    Create(AnnouncementDraft),
    Update {
        id: String,
        patch: AnnouncementPatch,
    },
    Delete {
        id: String,
    },
}

/// Reads a JSON array of questions and checks every correct answer is one of
/// its options.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or a question is
/// inconsistent.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read questions from {}", path.display()))?;
    let questions: Vec<Question> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of questions", path.display()))?;

    for (index, question) in questions.iter().enumerate() {
        if question.options.is_empty() {
            bail!("question {} has no options", index + 1);
        }
        if !question.is_consistent() {
            bail!(
                "question {}: correct answer {:?} is not one of its options",
                index + 1,
                question.correct_answer
            );
        }
    }

    Ok(questions)
}

/// # Errors
/// Returns an error if either list cannot be fetched.
pub async fn execute_dashboard(gateway: &Gateway) -> Result<()> {
    print_json(&dashboard::overview(gateway).await?)
}

/// # Errors
/// Returns an error if the questions file is invalid or the API call fails.
pub async fn execute_quiz(action: QuizAction, gateway: &Gateway) -> Result<()> {
    match action {
        QuizAction::List => print_json(&quizzes::list_quizzes(gateway).await?)?,
        QuizAction::Create {
            title,
            description,
            questions,
        } => {
            let draft = QuizDraft {
                title,
                description,
                questions: questions
                    .as_deref()
                    .map(load_questions)
                    .transpose()?
                    .unwrap_or_default(),
            };
            print_json(&quizzes::create_quiz(gateway, &draft).await?)?;
        }
        QuizAction::Update {
            id,
            title,
            description,
            questions,
        } => {
            let patch = QuizPatch {
                title,
                description,
                questions: questions.as_deref().map(load_questions).transpose()?,
            };
            if patch.is_empty() {
                bail!("nothing to update: pass --title, --description or --questions");
            }
            print_json(&quizzes::update_quiz(gateway, &id, &patch).await?)?;
        }
        QuizAction::Delete { id } => {
            quizzes::delete_quiz(gateway, &id).await?;
            println!("Quiz {id} deleted.");
        }
    }

    Ok(())
}

/// # Errors
/// Returns an error if the API call fails.
pub async fn execute_announcement(action: AnnouncementAction, gateway: &Gateway) -> Result<()> {
    match action {
        AnnouncementAction::List => {
            print_json(&announcements::list_announcements(gateway).await?)?;
        }
        AnnouncementAction::Create(draft) => {
            print_json(&announcements::create_announcement(gateway, &draft).await?)?;
        }
        AnnouncementAction::Update { id, patch } => {
            if patch.is_empty() {
                bail!("nothing to update: pass --title or --content");
            }
            print_json(&announcements::update_announcement(gateway, &id, &patch).await?)?;
        }
        AnnouncementAction::Delete { id } => {
            announcements::delete_announcement(gateway, &id).await?;
            println!("Announcement {id} deleted.");
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("questions.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_consistent_questions() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"question": "2 + 2", "options": ["3", "4"], "correctAnswer": "4"}]"#,
        );

        let questions = load_questions(&path).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "4");
    }

    #[test]
    fn rejects_answer_outside_options() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"question": "2 + 2", "options": ["3", "5"], "correctAnswer": "4"}]"#,
        );

        let err = load_questions(&path).unwrap_err();
        assert!(err.to_string().contains("question 1"));
    }

    #[test]
    fn rejects_question_without_options() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[{"question": "2 + 2", "options": [], "correctAnswer": "4"}]"#,
        );

        assert!(load_questions(&path).is_err());
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        assert!(load_questions(&dir.path().join("missing.json")).is_err());

        let path = write(&dir, r#"{"question": "not a list"}"#);
        let err = load_questions(&path).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
