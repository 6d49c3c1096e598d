//! quizcoach-providers — chat backend integrations.
//!
//! Implements the `ChatProvider` trait for OpenAI, Mistral, and Ollama,
//! plus a mock backend for tests, and the configuration/factory layer that
//! selects one backend at startup.

pub mod config;
pub mod error;
pub mod mistral;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, QuizcoachConfig};
pub use error::ProviderError;
