//! Response Extractor/Validator.
//!
//! Turns raw provider text into a typed result in three steps: slice the
//! outermost `{ ... }` span, parse it, then check every required field
//! explicitly. Evaluation scores are clamped to `[0, 1]` and rounded to two
//! decimals (half away from zero). All functions here are pure.

use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::model::{EvaluationResult, Question, QuestionKind, QuestionSet};

type Result<T> = std::result::Result<T, ExtractionError>;

/// Locate the JSON object embedded in `raw`: from the first `{` up to and
/// including the last `}`.
pub fn locate_json(raw: &str) -> Result<&str> {
    let start = raw.find('{').ok_or(ExtractionError::NoJsonFound)?;
    let end = raw.rfind('}').map(|i| i + 1).unwrap_or(0);
    if end <= start {
        return Err(ExtractionError::NoJsonFound);
    }
    Ok(&raw[start..end])
}

fn parse_object(raw: &str) -> Result<Map<String, Value>> {
    let slice = locate_json(raw)?;
    let value: Value =
        serde_json::from_str(slice).map_err(|e| ExtractionError::MalformedJson {
            reason: e.to_string(),
            raw: raw.to_string(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        // `{`..`}` bounds make any successful parse an object.
        other => Err(ExtractionError::SchemaViolation(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

/// Extract and validate a [`QuestionSet`] from raw provider text.
pub fn extract_question_set(raw: &str) -> Result<QuestionSet> {
    let object = parse_object(raw)?;
    question_set_from_object(&object)
}

/// Validate an already-parsed JSON value as a [`QuestionSet`].
///
/// Used for payloads that arrive as JSON rather than provider prose, such as
/// manual edits of a stored test.
pub fn question_set_from_value(value: &Value) -> Result<QuestionSet> {
    match value {
        Value::Object(object) => question_set_from_object(object),
        _ => Err(ExtractionError::SchemaViolation(
            "question set must be a JSON object".into(),
        )),
    }
}

fn question_set_from_object(object: &Map<String, Value>) -> Result<QuestionSet> {
    let items = match object.get("questions") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(violation("`questions` must be an array")),
        None => return Err(violation("missing `questions` field")),
    };

    let questions = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_question(i, item))
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionSet { questions })
}

fn parse_question(index: usize, item: &Value) -> Result<Question> {
    let Value::Object(fields) = item else {
        return Err(violation(format!("questions[{index}] must be an object")));
    };

    let text = required_text(fields, index, "question")?;
    let answer = required_text(fields, index, "answer")?;

    let label = match fields.get("type") {
        Some(Value::String(label)) => label,
        Some(_) => return Err(violation(format!("questions[{index}].type must be a string"))),
        None => return Err(violation(format!("questions[{index}] is missing `type`"))),
    };
    let kind = QuestionKind::from_label(label).ok_or_else(|| {
        violation(format!("questions[{index}] has unknown type '{label}'"))
    })?;

    let options = match fields.get("options") {
        Some(Value::Array(options)) => options
            .iter()
            .map(|o| match o {
                Value::String(s) => Ok(s.clone()),
                _ => Err(violation(format!(
                    "questions[{index}].options must contain only strings"
                ))),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(violation(format!("questions[{index}].options must be an array"))),
        None => return Err(violation(format!("questions[{index}] is missing `options`"))),
    };

    match kind {
        QuestionKind::Multiple if options.is_empty() => Err(violation(format!(
            "questions[{index}] is multiple choice but has no options"
        ))),
        QuestionKind::Discursive if !options.is_empty() => Err(violation(format!(
            "questions[{index}] is discursive but lists options"
        ))),
        _ => Ok(Question {
            text,
            kind,
            options,
            answer,
        }),
    }
}

fn required_text(fields: &Map<String, Value>, index: usize, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(violation(format!("questions[{index}].{name} is empty"))),
        Some(_) => Err(violation(format!("questions[{index}].{name} must be a string"))),
        None => Err(violation(format!("questions[{index}] is missing `{name}`"))),
    }
}

/// Extract a graded [`EvaluationResult`] from raw provider text.
pub fn extract_evaluation_result(raw: &str) -> Result<EvaluationResult> {
    let object = parse_object(raw)?;

    let score = match object.get("score") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| violation("`score` is not representable as a float"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| violation(format!("`score` '{s}' is not a number")))?,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => return Err(violation("`score` must be a number")),
        None => return Err(violation("missing `score` field")),
    };
    if score.is_nan() {
        return Err(violation("`score` is NaN"));
    }

    let justification = match object.get("justification") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(violation("`justification` must be a string")),
        None => return Err(violation("missing `justification` field")),
    };

    Ok(EvaluationResult {
        score: normalize_score(score),
        justification,
    })
}

/// Clamp into `[0, 1]`, then round to two decimals.
pub fn normalize_score(score: f64) -> f64 {
    let clamped = score.clamp(0.0, 1.0);
    (clamped * 100.0).round() / 100.0
}

fn violation(message: impl Into<String>) -> ExtractionError {
    ExtractionError::SchemaViolation(message.into())
}
