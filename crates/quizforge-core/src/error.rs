//! Error taxonomy.
//!
//! `ProviderError` classifies transport-level failures and lives here so the
//! engine and the boundary can match on it without string inspection.
//! `QuizError` is what every public engine operation returns.

use thiserror::Error;

use crate::model::ProviderKind;

/// Longest slice of an offending provider response carried in messages.
const RAW_SNIPPET_CHARS: usize = 200;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider answered but carried no text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The call was cancelled through the engine's cancellation token.
    #[error("provider call cancelled")]
    Cancelled,
}

/// Failures turning raw provider text into a typed result.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in provider response")]
    NoJsonFound,

    #[error("provider response is not valid JSON: {reason}; response began with: {}", snippet(.raw))]
    MalformedJson { reason: String, raw: String },

    #[error("provider response violates the expected schema: {0}")]
    SchemaViolation(String),
}

/// Classified failure of a generation or evaluation call.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("invalid provider '{0}': use 'gemini' or 'openai'")]
    InvalidProvider(String),

    #[error("{0}")]
    ProviderUnavailable(String),

    #[error("provider call failed: {0}")]
    ProviderCallFailed(#[from] ProviderError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl QuizError {
    pub(crate) fn unavailable(kind: ProviderKind) -> Self {
        QuizError::ProviderUnavailable(format!("no credential configured for provider '{kind}'"))
    }

    /// Stable snake_case identifier of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::InvalidProvider(_) => "invalid_provider",
            QuizError::ProviderUnavailable(_) => "provider_unavailable",
            QuizError::ProviderCallFailed(_) => "provider_call_failed",
            QuizError::Extraction(ExtractionError::NoJsonFound) => "no_json_found",
            QuizError::Extraction(ExtractionError::MalformedJson { .. }) => "malformed_json",
            QuizError::Extraction(ExtractionError::SchemaViolation(_)) => "schema_violation",
        }
    }

    /// HTTP status a front door should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            QuizError::InvalidProvider(_) => 400,
            QuizError::ProviderUnavailable(_) => 503,
            QuizError::ProviderCallFailed(_) | QuizError::Extraction(_) => 502,
        }
    }

    /// Returns `true` if the caller supplied something unusable.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

fn snippet(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(RAW_SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_message_truncates_raw_text() {
        let raw = "x".repeat(500);
        let err = ExtractionError::MalformedJson {
            reason: "EOF while parsing".into(),
            raw,
        };
        let msg = err.to_string();
        assert!(msg.contains("EOF while parsing"));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
    }

    #[test]
    fn short_raw_text_is_not_marked_truncated() {
        let err = ExtractionError::MalformedJson {
            reason: "bad".into(),
            raw: "{oops".into(),
        };
        assert!(err.to_string().ends_with("{oops"));
    }

    #[test]
    fn classification() {
        let invalid = QuizError::InvalidProvider("x".into());
        assert_eq!(invalid.kind(), "invalid_provider");
        assert!(invalid.is_client_error());

        let call: QuizError = ProviderError::Timeout(120).into();
        assert_eq!(call.kind(), "provider_call_failed");
        assert_eq!(call.status_code(), 502);

        let extraction: QuizError = ExtractionError::NoJsonFound.into();
        assert_eq!(extraction.kind(), "no_json_found");
        assert!(!extraction.is_client_error());

        let unavailable = QuizError::unavailable(ProviderKind::Gemini);
        assert_eq!(unavailable.status_code(), 503);
        assert!(unavailable.to_string().contains("gemini"));
    }
}
