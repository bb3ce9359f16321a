//! The `quizforge evaluate` command.

use std::path::PathBuf;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use quizforge_core::model::EvaluationRequest;
use quizforge_providers::build_engine;
use quizforge_providers::config::load_config_from;

pub async fn execute(
    question: String,
    correct_answer: String,
    user_answer: String,
    config_path: Option<PathBuf>,
    cancel: CancellationToken,
) -> Result<()> {
    anyhow::ensure!(
        !question.trim().is_empty() && !correct_answer.trim().is_empty(),
        "question and correct answer are required"
    );

    let config = load_config_from(config_path.as_deref())?;
    let engine = build_engine(&config)?.with_cancellation(cancel);

    let request = EvaluationRequest {
        question,
        correct_answer,
        user_answer,
    };
    let result = engine.evaluate(&request).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
