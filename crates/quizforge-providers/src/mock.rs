//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizforge_core::model::ProviderKind;
use quizforge_core::traits::{CompletionRequest, CompletionResponse, LlmProvider};
use quizforge_core::ProviderError;

/// A mock LLM provider for exercising the engine without real API calls.
///
/// Returns configurable responses based on prompt content matching, or a
/// fixed failure.
pub struct MockProvider {
    kind: ProviderKind,
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    /// Default response if no prompt matches.
    default_response: String,
    /// HTTP status to fail every call with.
    failure_status: Option<u16>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with the given prompt→response mappings.
    pub fn new(kind: ProviderKind, responses: HashMap<String, String>) -> Self {
        Self {
            kind,
            responses,
            default_response: "{}".to_string(),
            failure_status: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(kind: ProviderKind, response: &str) -> Self {
        let mut mock = Self::new(kind, HashMap::new());
        mock.default_response = response.to_string();
        mock
    }

    /// Create a mock whose every call fails with an API error.
    pub fn failing(kind: ProviderKind, status: u16) -> Self {
        let mut mock = Self::new(kind, HashMap::new());
        mock.failure_status = Some(status);
        mock
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        if let Some(status) = self.failure_status {
            return Err(ProviderError::ApiError {
                status,
                message: "mock failure".into(),
            });
        }

        // Find a matching response based on prompt content
        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(CompletionResponse {
            content: content.trim().to_string(),
            model: "mock-model".into(),
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: prompt.into(),
            options: Default::default(),
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response(ProviderKind::Gemini, "  {\"a\": 1}\n");

        let response = provider.complete(&request("anything")).await.unwrap();
        assert_eq!(response.content, "{\"a\": 1}");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("Photosynthesis".to_string(), "plants".to_string());
        responses.insert("Student answer".to_string(), "grade".to_string());

        let provider = MockProvider::new(ProviderKind::OpenAi, responses);

        let resp = provider
            .complete(&request("Create a test about Photosynthesis"))
            .await
            .unwrap();
        assert_eq!(resp.content, "plants");

        let resp = provider.complete(&request("Student answer: 4")).await.unwrap();
        assert_eq!(resp.content, "grade");

        let resp = provider.complete(&request("unrelated")).await.unwrap();
        assert_eq!(resp.content, "{}");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn failing_mock() {
        let provider = MockProvider::failing(ProviderKind::OpenAi, 502);
        let err = provider.complete(&request("x")).await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 502, .. }));
        assert_eq!(provider.call_count(), 1);
    }
}
