//! LLM provider integrations for quizforge.
//!
//! Implements the `LlmProvider` trait for Gemini (direct completion) and
//! OpenAI (chat completion), plus the configuration layer that decides which
//! of them an engine gets.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use config::{build_engine, create_provider, load_config, ProviderConfig, QuizforgeConfig};
pub use quizforge_core::ProviderError;
