//! Core error types.
//!
//! These map onto the HTTP layer's taxonomy: `QuestionNotFound` and
//! `EmptySession` become 400s, `Generation` becomes a 500 that still carries
//! the grading result computed before the failure, and `Template` /
//! `DataFile` indicate broken deployment configuration.

use thiserror::Error;

/// Errors from the grading and feedback pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The submitted question has no entry in the answer key.
    #[error("question not found")]
    QuestionNotFound,

    /// A template placeholder had no value supplied for it.
    #[error("no value supplied for template placeholder `{0}`")]
    Template(String),

    /// A data or template file could not be read.
    #[error("failed to read {path}")]
    DataFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Loaded data failed validation.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The LLM call or its response handling failed.
    #[error("feedback generation failed: {0}")]
    Generation(String),

    /// Final feedback was requested for a session with no recorded turns.
    #[error("session has no history to summarize")]
    EmptySession,
}
