//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use quizcoach_core::answers::AnswerKey;
use quizcoach_core::feedback::FeedbackGenerator;

/// Handles shared by every request handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Path to `quiz.json`, re-read per request so data edits show up
    /// without a restart.
    pub quiz_path: PathBuf,
    pub answer_key: Arc<AnswerKey>,
    pub generator: Arc<FeedbackGenerator>,
}
