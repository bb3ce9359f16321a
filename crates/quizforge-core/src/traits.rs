//! Provider Client Adapter contract.
//!
//! Implemented by the `quizforge-providers` crate. Adapters hold immutable
//! credentials only and never interpret the text they return.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::ProviderKind;

/// Trait for LLM backends that turn a rendered prompt into raw text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Which backend slot this adapter fills.
    fn kind(&self) -> ProviderKind;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Issue one completion call.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// Sampling options for one call. Backends that do not take an option
/// ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// A rendered prompt plus its call options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: CallOptions,
}

/// Raw text returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text with surrounding whitespace stripped.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}
