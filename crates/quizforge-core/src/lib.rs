//! Provider-agnostic quiz generation and grading.
//!
//! This crate defines the data model, the provider trait, prompt rendering,
//! response extraction, and the engine that ties them together. Concrete
//! HTTP adapters live in `quizforge-providers`.

pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod prompt;
pub mod traits;

pub use engine::{EngineConfig, QuizEngine};
pub use error::{ExtractionError, ProviderError, QuizError};
