//! quizcoach-core — Answer grading and the LLM feedback pipeline.
//!
//! This crate defines the quiz data model, the answer comparator, prompt
//! template rendering, the per-session conversation history, and the
//! feedback generator that ties them together over a swappable chat backend.

pub mod answers;
pub mod error;
pub mod feedback;
pub mod history;
pub mod model;
pub mod parser;
pub mod template;
pub mod traits;

pub use error::CoreError;
