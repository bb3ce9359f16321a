//! Core data model types for quizforge.
//!
//! Every type here is a request-scoped value: built when a call enters the
//! engine, consumed before it returns, never cached.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::QuizError;

/// Which language-model backend serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Direct-completion backend (Google Gemini `generateContent`).
    Gemini,
    /// Chat-completion backend (OpenAI `chat/completions`).
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(QuizError::InvalidProvider(s.to_string())),
        }
    }
}

/// The mix of questions requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    Discursive,
    /// Half multiple-choice, half discursive.
    Mixed,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "MULTIPLE_CHOICE"),
            QuestionType::Discursive => write!(f, "DISCURSIVE"),
            QuestionType::Mixed => write!(f, "MIXED"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" | "multiple" => Ok(QuestionType::MultipleChoice),
            "discursive" => Ok(QuestionType::Discursive),
            "mixed" => Ok(QuestionType::Mixed),
            _ => Err(format!(
                "unknown question type: '{s}' (expected multiple_choice, discursive, or mixed)"
            )),
        }
    }
}

/// Parameters for a test-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Subject of the test; also used as the stored title.
    pub topic: String,
    pub question_count: NonZeroU32,
    pub question_type: QuestionType,
    /// Free-form difficulty label (e.g. "easy").
    pub difficulty: String,
    /// Provider identifier as received from the boundary. Parsed by the
    /// engine so unknown identifiers surface as `InvalidProvider`.
    pub provider: String,
}

/// Label the prompt contract uses for multiple-choice items.
pub const MULTIPLE_LABEL: &str = "Multipla";
/// Label the prompt contract uses for discursive items.
pub const DISCURSIVE_LABEL: &str = "Discursiva";

/// Declared kind of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "Multipla")]
    Multiple,
    #[serde(rename = "Discursiva")]
    Discursive,
}

impl QuestionKind {
    /// Canonical wire label.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Multiple => MULTIPLE_LABEL,
            QuestionKind::Discursive => DISCURSIVE_LABEL,
        }
    }

    /// Parse a declared kind, accepting the prompt labels and common English
    /// spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().replace('-', "_").as_str() {
            "multipla" | "multiple" | "multiple_choice" => Some(QuestionKind::Multiple),
            "discursiva" | "discursive" => Some(QuestionKind::Discursive),
            _ => None,
        }
    }
}

/// A single generated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Empty for discursive questions, non-empty otherwise.
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

/// The validated result of a generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Canonical text form handed to the record store.
    pub fn to_canonical_json(&self) -> String {
        // Serializing plain strings and enums into a JSON string cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn count_of(&self, kind: QuestionKind) -> usize {
        self.questions.iter().filter(|q| q.kind == kind).count()
    }
}

/// Parameters for grading a free-text answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question: String,
    pub correct_answer: String,
    /// May be empty; the rubric in the prompt scores it 0.
    #[serde(default)]
    pub user_answer: String,
}

/// A normalized grade. `score` is always within `[0.0, 1.0]` with at most two
/// decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: f64,
    pub justification: String,
}
