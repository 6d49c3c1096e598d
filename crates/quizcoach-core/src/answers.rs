//! Answer key lookup and comparison.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::model::QuizAnswers;

/// The canonical answer key, indexed by exact question text.
///
/// Built once when `answers.json` is loaded so per-request lookup is O(1).
#[derive(Debug, Clone)]
pub struct AnswerKey {
    by_question: HashMap<String, Vec<String>>,
}

/// Result of comparing a submission against the canonical answers.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub is_match: bool,
    pub canonical: Vec<String>,
}

impl AnswerKey {
    pub fn new(answers: QuizAnswers) -> Self {
        let by_question = answers
            .answers
            .into_iter()
            .map(|entry| (entry.question, entry.answers))
            .collect();
        Self { by_question }
    }

    /// Compare a submitted answer list against the canonical list for the
    /// given question.
    ///
    /// Equality is order-sensitive and element-wise: `["a", "b"]` does not
    /// match `["b", "a"]`. Pure, no side effects.
    pub fn compare(&self, question: &str, submitted: &[String]) -> Result<Comparison, CoreError> {
        let canonical = self
            .by_question
            .get(question)
            .ok_or(CoreError::QuestionNotFound)?;

        Ok(Comparison {
            is_match: canonical == submitted,
            canonical: canonical.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.by_question.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_question.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionAnswers;

    fn key() -> AnswerKey {
        AnswerKey::new(QuizAnswers {
            answers: vec![
                QuestionAnswers {
                    question: "2+2=?".into(),
                    answers: vec!["4".into()],
                },
                QuestionAnswers {
                    question: "Primary colors?".into(),
                    answers: vec!["red".into(), "yellow".into(), "blue".into()],
                },
            ],
        })
    }

    #[test]
    fn exact_match() {
        let result = key().compare("2+2=?", &["4".to_string()]).unwrap();
        assert!(result.is_match);
        assert_eq!(result.canonical, vec!["4"]);
    }

    #[test]
    fn wrong_content_is_not_a_match() {
        let result = key().compare("2+2=?", &["5".to_string()]).unwrap();
        assert!(!result.is_match);
        assert_eq!(result.canonical, vec!["4"]);
    }

    #[test]
    fn order_matters() {
        let shuffled: Vec<String> = ["blue", "yellow", "red"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = key().compare("Primary colors?", &shuffled).unwrap();
        assert!(!result.is_match);

        let in_order: Vec<String> = ["red", "yellow", "blue"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(key().compare("Primary colors?", &in_order).unwrap().is_match);
    }

    #[test]
    fn missing_element_is_not_a_match() {
        let partial: Vec<String> = ["red", "yellow"].iter().map(|s| s.to_string()).collect();
        let result = key().compare("Primary colors?", &partial).unwrap();
        assert!(!result.is_match);
    }

    #[test]
    fn unknown_question() {
        let err = key().compare("3+3=?", &["6".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::QuestionNotFound));
    }
}
