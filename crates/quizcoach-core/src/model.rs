//! Quiz data model.
//!
//! Serde-derived types shared between the on-disk data files and the HTTP
//! wire format. Field renames preserve the JSON shapes the frontend and the
//! data files already use (`isCorrect`, `task_theme`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single quiz question with its answer options, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// The full quiz as served to the client. Question order is preserved
/// through load and re-serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizData {
    pub quiz: Vec<QuizQuestion>,
}

/// Canonical answers for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswers {
    pub question: String,
    pub answers: Vec<String>,
}

/// The full answer key as stored in `answers.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswers {
    pub answers: Vec<QuestionAnswers>,
}

/// An inbound answer submission.
///
/// `start` requests a fresh session; otherwise `session_id` identifies the
/// conversation to continue. A missing or unknown id silently starts a new
/// empty history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub answers: Vec<String>,
    pub start: bool,
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Whether the submitted answers matched the canonical list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Correct,
    Incorrect,
}

impl fmt::Display for Correctness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correctness::Correct => write!(f, "correct"),
            Correctness::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Graded-answer details fed into the message template. Transient, built
/// per request.
#[derive(Debug, Clone)]
pub struct MessageDetails {
    pub question: String,
    pub correctness: Correctness,
    pub correct_answers: Vec<String>,
    pub answers: Vec<String>,
}

/// Outbound feedback for one graded answer. The session id is returned so
/// the client can echo it on subsequent calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Outbound closing summary for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalFeedback {
    pub feedback: String,
}

/// Pedagogical framing for the quiz, loaded once at startup from
/// `details.json` and injected into the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemDetails {
    #[serde(rename = "task_theme")]
    pub theme: String,
    #[serde(rename = "task_description")]
    pub description: String,
    #[serde(rename = "task_goal")]
    pub goal: String,
    /// User skill level, 1-based.
    pub user_level: u32,
}
