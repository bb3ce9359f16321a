//! The `quizforge generate` command.

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use quizforge_core::model::{GenerationRequest, QuestionType};
use quizforge_providers::build_engine;
use quizforge_providers::config::load_config_from;

use crate::store::TestStore;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    topic: String,
    count: u32,
    question_type: String,
    difficulty: String,
    provider: String,
    config_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    cancel: CancellationToken,
) -> Result<()> {
    // Validate inputs
    anyhow::ensure!(!topic.trim().is_empty(), "topic must not be empty");
    let question_count = NonZeroU32::new(count).context("count must be at least 1")?;
    let question_type: QuestionType = question_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let config = load_config_from(config_path.as_deref())?;
    let engine = build_engine(&config)?.with_cancellation(cancel);
    let store = TestStore::open(store_path.unwrap_or_else(|| config.store_path.clone()));

    let request = GenerationRequest {
        topic,
        question_count,
        question_type,
        difficulty,
        provider,
    };

    eprintln!(
        "Generating {} {} question(s) about \"{}\" with {}...",
        request.question_count, request.question_type, request.topic, request.provider
    );
    let questions = engine.generate(&request).await?;

    // Only a completed generation is persisted.
    let id = store.create(&request.topic, &questions)?;
    println!("Test created (id {id})");
    Ok(())
}
