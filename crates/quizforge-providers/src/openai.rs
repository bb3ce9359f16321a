//! OpenAI chat-completion provider.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizforge_core::model::ProviderKind;
use quizforge_core::traits::{CompletionRequest, CompletionResponse, LlmProvider};
use quizforge_core::ProviderError;

use crate::http;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// OpenAI-compatible chat API provider.
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
        model: Option<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: http::build_client()?,
        })
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let start = Instant::now();

        let body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(http::send_error)?;
        let response = http::check_status(response, &self.model).await?;
        let api_response: OpenAiResponse = http::read_json(response).await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(CompletionResponse {
            content: content.trim().to_string(),
            model: api_response.model,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::traits::CallOptions;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"content": content, "role": "assistant"}, "index": 0}],
            "model": "gpt-4-0613",
            "usage": {"prompt_tokens": 40, "completion_tokens": 15, "total_tokens": 55}
        })
    }

    #[tokio::test]
    async fn successful_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("  {\"score\": 0.5, \"justification\": \"half\"}\n")),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("test-key", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "Grade this".into(),
            options: CallOptions::default(),
        };

        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.content, "{\"score\": 0.5, \"justification\": \"half\"}");
        assert_eq!(response.model, "gpt-4-0613");
    }

    #[tokio::test]
    async fn evaluation_options_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_json(serde_json::json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "Grade this"}],
                "temperature": 0.0,
                "max_tokens": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "Grade this".into(),
            options: CallOptions {
                temperature: Some(0.0),
                max_tokens: Some(300),
            },
        };

        assert_eq!(provider.complete(&request).await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn organization_header_and_custom_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("OpenAI-Organization", "org-123"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(
            "key",
            Some(server.uri()),
            Some("org-123".into()),
            Some("gpt-4o".into()),
        )
        .unwrap();
        let request = CompletionRequest {
            prompt: "x".into(),
            options: CallOptions::default(),
        };
        assert!(provider.complete(&request).await.is_ok());
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("bad", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "x".into(),
            options: CallOptions::default(),
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "x".into(),
            options: CallOptions::default(),
        };

        let err = provider.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn blank_content_is_passed_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("")))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "x".into(),
            options: CallOptions::default(),
        };
        assert_eq!(provider.complete(&request).await.unwrap().content, "");
    }

    #[tokio::test]
    async fn null_content_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}],
                "model": "gpt-4"
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("key", Some(server.uri()), None, None).unwrap();
        let request = CompletionRequest {
            prompt: "x".into(),
            options: CallOptions::default(),
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
