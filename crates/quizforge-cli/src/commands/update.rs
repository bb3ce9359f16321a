//! The `quizforge update` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use quizforge_core::extract::question_set_from_value;

use crate::commands::open_store;

pub fn execute(
    id: u64,
    questions_path: PathBuf,
    config_path: Option<PathBuf>,
    store: Option<PathBuf>,
) -> Result<()> {
    let content = std::fs::read_to_string(&questions_path)
        .with_context(|| format!("failed to read {}", questions_path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .context("invalid question format: the file must contain JSON")?;
    let set = question_set_from_value(&value).context("invalid question format")?;

    let store = open_store(config_path.as_deref(), store)?;
    anyhow::ensure!(
        store.update(id, &set.to_canonical_json())?,
        "test {id} not found"
    );
    println!("Questions of test {id} updated ({} question(s))", set.questions.len());
    Ok(())
}
