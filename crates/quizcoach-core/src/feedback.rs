//! The feedback generation pipeline.
//!
//! Per request: build the outbound message from the message template,
//! compose the conversation (system message + session history + new user
//! message), invoke the configured chat backend, parse the `<feedback>`
//! tag out of the reply, record the turn, and return the plain text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CoreError;
use crate::history::{new_session_id, HistoryStore, Turn};
use crate::model::{MessageDetails, SystemDetails};
use crate::parser::parse_reply;
use crate::template::render;
use crate::traits::{ChatMessage, ChatProvider, ChatRequest};

const SYSTEM_TEMPLATE_FILE: &str = "system_template.txt";
const MESSAGE_TEMPLATE_FILE: &str = "message_template.txt";

/// Closing prompt replayed through a session's history for the terminal
/// summary. Takes no new answer data.
const FINAL_PROMPT: &str = "The quiz is now over. Summarize how the user did across \
     the whole session and close with a short encouraging remark. \
     Wrap your summary in a <feedback> tag.";

/// Sampling configuration for feedback generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier passed to the backend.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            max_tokens: 1024,
            temperature: 0.5,
        }
    }
}

/// Generates conversational feedback for graded answers.
///
/// The system message is rendered once at construction and fixed for the
/// process lifetime; the message template is re-read per call (small,
/// static file, deliberately uncached).
pub struct FeedbackGenerator {
    provider: Arc<dyn ChatProvider>,
    config: GeneratorConfig,
    system_message: String,
    data_dir: PathBuf,
    history: HistoryStore,
}

impl FeedbackGenerator {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        config: GeneratorConfig,
        details: &SystemDetails,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, CoreError> {
        let data_dir = data_dir.into();
        let system_template = read_data_file(&data_dir.join(SYSTEM_TEMPLATE_FILE))?;
        let system_message = render(
            &system_template,
            &[
                ("theme", details.theme.as_str()),
                ("description", details.description.as_str()),
                ("goal", details.goal.as_str()),
                ("level", &details.user_level.to_string()),
            ],
        )?;

        Ok(Self {
            provider,
            config,
            system_message,
            data_dir,
            history: HistoryStore::new(),
        })
    }

    /// Issue a fresh session token.
    pub fn start_session(&self) -> String {
        new_session_id()
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    /// Generate feedback for one graded answer within a session.
    pub async fn generate(
        &self,
        session_id: &str,
        details: &MessageDetails,
    ) -> Result<String, CoreError> {
        let message_template = read_data_file(&self.data_dir.join(MESSAGE_TEMPLATE_FILE))?;
        let message = render(
            &message_template,
            &[
                ("question", details.question.as_str()),
                ("correctness", &details.correctness.to_string()),
                ("correct_answers", &details.correct_answers.join("; ")),
                ("answers", &details.answers.join("; ")),
            ],
        )?;

        let history = self.history.get_or_create(session_id);
        // Held across the backend call: same-session requests serialize so
        // turn order can never interleave. Other sessions are unaffected.
        let mut turns = history.lock().await;

        let feedback = self.invoke(session_id, &turns, message.clone()).await?;
        turns.push(Turn {
            user: message,
            assistant: feedback.clone(),
        });

        Ok(feedback)
    }

    /// Generate the terminal summary for a session by replaying its
    /// accumulated history with a fixed closing prompt.
    ///
    /// Fails with [`CoreError::EmptySession`] when the session is unknown
    /// or has no recorded turns.
    pub async fn generate_final(&self, session_id: &str) -> Result<String, CoreError> {
        let history = self.history.get(session_id).ok_or(CoreError::EmptySession)?;
        let mut turns = history.lock().await;
        if turns.is_empty() {
            return Err(CoreError::EmptySession);
        }

        let feedback = self
            .invoke(session_id, &turns, FINAL_PROMPT.to_string())
            .await?;
        turns.push(Turn {
            user: FINAL_PROMPT.to_string(),
            assistant: feedback.clone(),
        });

        Ok(feedback)
    }

    async fn invoke(
        &self,
        session_id: &str,
        turns: &[Turn],
        message: String,
    ) -> Result<String, CoreError> {
        let mut messages = Vec::with_capacity(turns.len() * 2 + 2);
        messages.push(ChatMessage::system(self.system_message.clone()));
        for turn in turns {
            messages.push(ChatMessage::user(turn.user.clone()));
            messages.push(ChatMessage::assistant(turn.assistant.clone()));
        }
        messages.push(ChatMessage::user(message));

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::debug!(
            session_id,
            backend = self.provider.name(),
            turns = turns.len(),
            "invoking chat backend"
        );

        let reply = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| CoreError::Generation(format!("{e:#}")))?;

        Ok(parse_reply(&reply.content))
    }
}

fn read_data_file(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|source| CoreError::DataFile {
        path: path.display().to_string(),
        source,
    })
}
