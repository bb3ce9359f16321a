//! Generation/Evaluation Orchestrator.
//!
//! Each call runs `prompt built -> provider called -> extracted` once and
//! stops at the first failure. Provider choice is resolved before the call;
//! there is no mid-call fallback and no retry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{ProviderError, QuizError};
use crate::extract::{extract_evaluation_result, extract_question_set};
use crate::model::{
    EvaluationRequest, EvaluationResult, GenerationRequest, ProviderKind, QuestionSet,
};
use crate::prompt::{build_evaluation_prompt, build_generation_prompt};
use crate::traits::{CallOptions, CompletionRequest, LlmProvider};

/// Call options per operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub generation: CallOptions,
    pub evaluation: CallOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: CallOptions {
                temperature: Some(0.7),
                max_tokens: None,
            },
            evaluation: CallOptions {
                temperature: Some(0.0),
                max_tokens: Some(300),
            },
        }
    }
}

/// Order in which backends are tried when an evaluation names none.
const EVALUATION_PREFERENCE: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];

/// The orchestrator. Holds explicitly constructed adapters; no other state.
pub struct QuizEngine {
    providers: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
    config: EngineConfig,
    cancellation: Option<CancellationToken>,
}

impl QuizEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            providers: HashMap::new(),
            config,
            cancellation: None,
        }
    }

    /// Register an adapter in the slot named by its [`LlmProvider::kind`].
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Abort in-flight provider calls when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Backends that have an adapter configured.
    pub fn configured(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<_> = self.providers.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Generate a test and return the canonical text the boundary stores.
    pub async fn generate(&self, req: &GenerationRequest) -> Result<String, QuizError> {
        self.generate_set(req)
            .await
            .map(|set| set.to_canonical_json())
    }

    /// Generate a test and return it in typed form.
    #[instrument(
        skip(self, req),
        fields(provider = %req.provider, count = req.question_count.get())
    )]
    pub async fn generate_set(&self, req: &GenerationRequest) -> Result<QuestionSet, QuizError> {
        let kind: ProviderKind = req.provider.parse()?;
        let provider = self
            .providers
            .get(&kind)
            .ok_or_else(|| QuizError::unavailable(kind))?;

        let prompt = build_generation_prompt(req);
        let raw = self
            .call(provider.as_ref(), prompt, self.config.generation)
            .await?;

        let set = extract_question_set(&raw).inspect_err(|e| {
            tracing::warn!(provider = %kind, "generation response rejected: {e}");
        })?;
        tracing::info!(
            provider = %kind,
            questions = set.questions.len(),
            "generated question set"
        );
        Ok(set)
    }

    /// Grade a free-text answer. The backend is chosen by availability.
    #[instrument(skip_all)]
    pub async fn evaluate(&self, req: &EvaluationRequest) -> Result<EvaluationResult, QuizError> {
        let provider = self.evaluation_provider()?;

        let prompt = build_evaluation_prompt(req);
        let raw = self
            .call(provider.as_ref(), prompt, self.config.evaluation)
            .await?;

        let result = extract_evaluation_result(&raw).inspect_err(|e| {
            tracing::warn!(provider = provider.name(), "evaluation response rejected: {e}");
        })?;
        tracing::info!(provider = provider.name(), score = result.score, "graded answer");
        Ok(result)
    }

    fn evaluation_provider(&self) -> Result<&Arc<dyn LlmProvider>, QuizError> {
        EVALUATION_PREFERENCE
            .iter()
            .find_map(|kind| self.providers.get(kind))
            .ok_or_else(|| {
                QuizError::ProviderUnavailable("no AI provider is configured".to_string())
            })
    }

    async fn call(
        &self,
        provider: &dyn LlmProvider,
        prompt: String,
        options: CallOptions,
    ) -> Result<String, QuizError> {
        let request = CompletionRequest { prompt, options };
        let response = match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ProviderError::Cancelled),
                response = provider.complete(&request) => response,
            },
            None => provider.complete(&request).await,
        }?;

        tracing::debug!(
            provider = provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            bytes = response.content.len(),
            "provider responded"
        );
        Ok(response.content.trim().to_string())
    }
}
