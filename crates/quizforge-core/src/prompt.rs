//! Prompt Builder.
//!
//! Pure template rendering. The output schemas embedded here are the same
//! contract `extract` validates against; the tests below keep them in step.

use crate::model::{EvaluationRequest, GenerationRequest, QuestionType};

/// Output shape for multiple-choice items, as shown to the model.
pub const MULTIPLE_CHOICE_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "Question text",
      "type": "Multipla",
      "options": ["A", "B", "C", "D"],
      "answer": "Correct answer"
    }
  ]
}"#;

/// Output shape for discursive items, as shown to the model.
pub const DISCURSIVE_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "Question text",
      "type": "Discursiva",
      "options": [],
      "answer": "Correct answer"
    }
  ]
}"#;

/// Output shape for a grade, as shown to the model.
pub const EVALUATION_SCHEMA: &str = r#"{
  "score": <number between 0 and 1>,
  "justification": "<short explanation>"
}"#;

const MIXED_INSTRUCTION: &str = "Because the requested question type is MIXED, generate half of the questions as multiple choice and the other half as discursive.";

/// Render the test-generation prompt. Request fields are interpolated verbatim.
pub fn build_generation_prompt(req: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Create a test with {count} questions about the topic \"{topic}\".\n\
         Question type: {qtype}.\n\
         Difficulty level: {difficulty}.\n\n",
        count = req.question_count,
        topic = req.topic,
        qtype = req.question_type,
        difficulty = req.difficulty,
    );

    if req.question_type == QuestionType::Mixed {
        prompt.push_str(MIXED_INSTRUCTION);
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "For every multiple-choice question, the result must be **exclusively** in the following JSON format:\n",
    );
    prompt.push_str(MULTIPLE_CHOICE_SCHEMA);
    prompt.push_str(
        "\n\nFor every discursive question, the result must be **exclusively** in the following JSON format:\n",
    );
    prompt.push_str(DISCURSIVE_SCHEMA);
    prompt.push_str(
        "\n\nAll questions go in a single \"questions\" array. Respond with the JSON object only.\n",
    );
    prompt
}

/// Render the answer-grading prompt, including the scoring rubric.
pub fn build_evaluation_prompt(req: &EvaluationRequest) -> String {
    format!(
        "You are a grader of discursive questions.\n\
         Below are a question, its correct answer (reference), and a student's answer.\n\n\
         Your task is:\n\
         1. Compare the student's answer with the reference.\n\
         2. Assign a score from 0 to 1:\n\
         \x20  - 1 if it is completely correct,\n\
         \x20  - between 0.1 and 0.9 if it is partially correct,\n\
         \x20  - 0 if it is incorrect or empty.\n\
         3. Briefly justify the score based on the comparison.\n\n\
         Response format (JSON):\n\
         {schema}\n\n\
         Question: {question}\n\
         Reference answer: {correct}\n\
         Student answer: {user}\n",
        schema = EVALUATION_SCHEMA,
        question = req.question,
        correct = req.correct_answer,
        user = req.user_answer,
    )
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::extract::extract_question_set;
    use crate::model::QuestionKind;

    fn generation(question_type: QuestionType) -> GenerationRequest {
        GenerationRequest {
            topic: "Photosynthesis".into(),
            question_count: NonZeroU32::new(4).unwrap(),
            question_type,
            difficulty: "easy".into(),
            provider: "gemini".into(),
        }
    }

    #[test]
    fn generation_prompt_states_request_fields() {
        let prompt = build_generation_prompt(&generation(QuestionType::MultipleChoice));
        assert!(prompt.contains("4 questions"));
        assert!(prompt.contains("\"Photosynthesis\""));
        assert!(prompt.contains("Question type: MULTIPLE_CHOICE."));
        assert!(prompt.contains("Difficulty level: easy."));
        assert!(!prompt.contains(MIXED_INSTRUCTION));
    }

    #[test]
    fn mixed_prompt_asks_for_half_and_half() {
        let prompt = build_generation_prompt(&generation(QuestionType::Mixed));
        assert!(prompt.contains(MIXED_INSTRUCTION));
    }

    #[test]
    fn fields_are_interpolated_without_escaping() {
        let mut req = generation(QuestionType::Discursive);
        req.topic = "Quotes \"inside\" {braces}".into();
        let prompt = build_generation_prompt(&req);
        assert!(prompt.contains("\"Quotes \"inside\" {braces}\""));
    }

    #[test]
    fn embedded_schemas_satisfy_the_extractor() {
        let multiple = extract_question_set(MULTIPLE_CHOICE_SCHEMA).unwrap();
        assert_eq!(multiple.questions[0].kind, QuestionKind::Multiple);

        let discursive = extract_question_set(DISCURSIVE_SCHEMA).unwrap();
        assert_eq!(discursive.questions[0].kind, QuestionKind::Discursive);
        assert!(discursive.questions[0].options.is_empty());
    }

    #[test]
    fn evaluation_prompt_carries_rubric_and_answers() {
        let prompt = build_evaluation_prompt(&EvaluationRequest {
            question: "2+2?".into(),
            correct_answer: "4".into(),
            user_answer: String::new(),
        });
        assert!(prompt.contains("1 if it is completely correct"));
        assert!(prompt.contains("between 0.1 and 0.9"));
        assert!(prompt.contains("0 if it is incorrect or empty"));
        assert!(prompt.contains("\"justification\""));
        assert!(prompt.contains("Question: 2+2?"));
        assert!(prompt.contains("Reference answer: 4"));
        assert!(prompt.ends_with("Student answer: \n"));
    }
}
