//! The chat backend seam.
//!
//! `ChatProvider` is implemented once per LLM backend in the
//! `quizcoach-providers` crate. The capability is deliberately narrow:
//! send a conversation, receive the reply text. The backend is chosen once
//! at startup from configuration, never per request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A chat completion request: the composed conversation plus sampling
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g. "gpt-4-turbo").
    pub model: String,
    /// System message, history, and the new user message, in order.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// The backend's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Raw reply text.
    pub content: String,
    /// Model that actually produced the reply.
    pub model: String,
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a conversation and receive the reply.
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<ChatReply>;
}
