//! Startup loading of the static data files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use quizcoach_core::answers::AnswerKey;
use quizcoach_core::model::{QuizAnswers, SystemDetails};

#[derive(Deserialize)]
struct DetailsFile {
    details: SystemDetails,
}

/// Load `answers.json` and index it by question text.
pub fn load_answer_key(data_dir: &Path) -> Result<AnswerKey> {
    let path = data_dir.join("answers.json");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read answer key: {}", path.display()))?;
    let answers: QuizAnswers = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answer key: {}", path.display()))?;
    Ok(AnswerKey::new(answers))
}

/// Load the pedagogical framing from `details.json` (under a `details` key).
pub fn load_details(data_dir: &Path) -> Result<SystemDetails> {
    let path = data_dir.join("details.json");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read details: {}", path.display()))?;
    let file: DetailsFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse details: {}", path.display()))?;
    if file.details.user_level == 0 {
        anyhow::bail!("user_level in {} must be positive", path.display());
    }
    Ok(file.details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_answer_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answers.json"),
            r#"{"answers":[{"question":"2+2=?","answers":["4"]}]}"#,
        )
        .unwrap();

        let key = load_answer_key(dir.path()).unwrap();
        assert_eq!(key.len(), 1);
        assert!(key.compare("2+2=?", &["4".to_string()]).unwrap().is_match);
    }

    #[test]
    fn malformed_answer_key_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("answers.json"), "not json").unwrap();

        let err = load_answer_key(dir.path()).unwrap_err();
        assert!(err.to_string().contains("answers.json"));
    }

    #[test]
    fn loads_details_under_wrapper_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("details.json"),
            r#"{"details":{"task_theme":"math","task_description":"d","task_goal":"g","user_level":1}}"#,
        )
        .unwrap();

        let details = load_details(dir.path()).unwrap();
        assert_eq!(details.theme, "math");
    }

    #[test]
    fn zero_user_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("details.json"),
            r#"{"details":{"task_theme":"math","task_description":"d","task_goal":"g","user_level":0}}"#,
        )
        .unwrap();

        let err = load_details(dir.path()).unwrap_err();
        assert!(err.to_string().contains("user_level"));
    }
}
